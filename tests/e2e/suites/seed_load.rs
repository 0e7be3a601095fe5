//! 种子数据加载测试

use std::sync::Arc;

use clickstream_generator::generators::{FakerValues, RngSource};
use clickstream_generator::seed::{PgSeedStore, SeedLoader};
use clickstream_shared::config::DatabaseConfig;
use clickstream_shared::database::Database;
use clickstream_shared::retry::RetryPolicy;

use crate::helpers::{DbVerifier, database_url};

async fn connect() -> Database {
    let config = DatabaseConfig {
        url: Some(database_url()),
        ..Default::default()
    };
    Database::connect(&config).await.unwrap()
}

#[tokio::test]
#[ignore = "需要运行中的 PostgreSQL"]
async fn test_seed_writes_users_and_products() {
    let db = connect().await;
    let store = PgSeedStore::new(db.clone());
    store.ensure_schema().await.unwrap();

    let loader = SeedLoader::new(Arc::new(store), Arc::new(FakerValues), RetryPolicy::none());
    let report = loader
        .load(50, &mut RngSource::seeded(9))
        .await
        .unwrap();
    assert_eq!(report.users, 50);

    let verifier = DbVerifier::new(db.pool().clone());
    assert_eq!(verifier.count_users(50).await.unwrap(), 50);
    assert_eq!(verifier.count_products(50).await.unwrap(), 50);
    assert_eq!(verifier.count_out_of_range_prices().await.unwrap(), 0);

    db.close().await;
}

#[tokio::test]
#[ignore = "需要运行中的 PostgreSQL"]
async fn test_reseeding_is_idempotent() {
    let db = connect().await;
    let store = Arc::new(PgSeedStore::new(db.clone()));
    store.ensure_schema().await.unwrap();

    let loader = SeedLoader::new(store, Arc::new(FakerValues), RetryPolicy::none());
    loader.load(10, &mut RngSource::seeded(1)).await.unwrap();
    loader.load(10, &mut RngSource::seeded(2)).await.unwrap();

    let verifier = DbVerifier::new(db.pool().clone());
    assert_eq!(verifier.count_users(10).await.unwrap(), 10);
    assert_eq!(verifier.count_products(10).await.unwrap(), 10);

    db.close().await;
}
