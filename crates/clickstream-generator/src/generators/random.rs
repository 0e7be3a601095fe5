//! 随机数来源
//!
//! 会话是否继续、挑选哪个用户、种子数据是否变更都通过 `RandomSource` 抽取，
//! 测试中可以替换为脚本化的序列以复现任意分支。

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 均匀整数抽取能力
pub trait RandomSource: Send {
    /// 在闭区间 `range` 内均匀抽取一个整数
    fn uniform(&mut self, range: RangeInclusive<u32>) -> u32;
}

/// 基于 rand 的随机数来源
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// 固定种子，输出可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 使用系统熵源
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// 为第 `worker` 个 worker 构造随机数来源
    ///
    /// 给定基础种子时各 worker 使用 `seed + worker`，互不重叠且可复现。
    pub fn for_worker(seed: Option<u64>, worker: usize) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed.wrapping_add(worker as u64)),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn uniform(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.random_range(range)
    }
}

/// 脚本化的随机数来源
///
/// 按顺序返回预设的值，超出区间的值会被夹到区间内。
/// 单点区间（如用户池只有 1 个用户）直接返回该值，不消耗脚本；
/// 脚本耗尽后返回区间下界。
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// 剩余未消耗的抽取值数量
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self, range: RangeInclusive<u32>) -> u32 {
        let (low, high) = (*range.start(), *range.end());
        if low == high {
            return low;
        }
        self.draws
            .pop_front()
            .map_or(low, |draw| draw.clamp(low, high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_source_stays_in_range() {
        let mut source = RngSource::seeded(7);
        for _ in 0..1000 {
            let draw = source.uniform(1..=100);
            assert!((1..=100).contains(&draw));
        }
    }

    #[test]
    fn test_seeded_sources_are_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        let left: Vec<u32> = (0..20).map(|_| a.uniform(1..=100)).collect();
        let right: Vec<u32> = (0..20).map(|_| b.uniform(1..=100)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_worker_seeds_differ() {
        let mut first = RngSource::for_worker(Some(1), 0);
        let mut second = RngSource::for_worker(Some(1), 1);
        let left: Vec<u32> = (0..20).map(|_| first.uniform(1..=1_000_000)).collect();
        let right: Vec<u32> = (0..20).map(|_| second.uniform(1..=1_000_000)).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn test_scripted_source_replays_in_order() {
        let mut source = ScriptedSource::new([50, 99, 49]);
        assert_eq!(source.uniform(1..=100), 50);
        assert_eq!(source.uniform(1..=100), 99);
        assert_eq!(source.uniform(1..=100), 49);
        assert_eq!(source.remaining(), 0);
        // 耗尽后返回下界
        assert_eq!(source.uniform(1..=100), 1);
    }

    #[test]
    fn test_scripted_source_single_point_range_does_not_consume() {
        let mut source = ScriptedSource::new([77]);
        assert_eq!(source.uniform(1..=1), 1);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.uniform(1..=100), 77);
    }

    #[test]
    fn test_scripted_source_clamps() {
        let mut source = ScriptedSource::new([0, 500]);
        assert_eq!(source.uniform(1..=100), 1);
        assert_eq!(source.uniform(1..=100), 100);
    }
}
