//! NormalSource port - 乱数の抽象化
//!
//! jitter 用の標準正規分布サンプル（平均 0、分散 1）を提供します。
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **ThreadNormal**: thread-local RNG（本番用、デフォルト）
//! - **SeededNormal**: シード固定の RNG（再現可能なスケジュール用）
//! - **FixedNormal**: 常に同じ値（テスト用、jitter 無効化）

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// NormalSource は標準正規分布のサンプルを生成
///
/// 各呼び出しは独立した 1 サンプル。範囲は有界ではない。
pub trait NormalSource {
    fn sample(&mut self) -> f64;
}

impl<F> NormalSource for F
where
    F: FnMut() -> f64,
{
    fn sample(&mut self) -> f64 {
        self()
    }
}

/// Draws from the process-wide `rand::thread_rng()`.
///
/// Zero-sized and `Send`; the thread-local generator is looked up per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNormal;

impl NormalSource for ThreadNormal {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().sample(StandardNormal)
    }
}

/// Deterministic source backed by a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededNormal {
    rng: StdRng,
}

impl SeededNormal {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NormalSource for SeededNormal {
    fn sample(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Returns the same sample on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNormal(pub f64);

impl FixedNormal {
    /// A source that always yields 0, which turns jitter off.
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl NormalSource for FixedNormal {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_normal_repeats_its_value() {
        let mut source = FixedNormal(-1.25);
        assert_eq!(source.sample(), -1.25);
        assert_eq!(source.sample(), -1.25);
        assert_eq!(FixedNormal::zero().sample(), 0.0);
    }

    #[test]
    fn seeded_normal_is_reproducible() {
        let mut a = SeededNormal::new(42);
        let mut b = SeededNormal::new(42);
        for _ in 0..16 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn closures_are_sources() {
        let mut values = vec![0.5, -0.5].into_iter();
        let mut source = move || values.next().unwrap_or(0.0);
        assert_eq!(NormalSource::sample(&mut source), 0.5);
        assert_eq!(NormalSource::sample(&mut source), -0.5);
        assert_eq!(NormalSource::sample(&mut source), 0.0);
    }

    #[test]
    fn thread_normal_has_standard_moments() {
        let mut source = ThreadNormal;
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| source.sample()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

        // 5 sigma 相当の許容幅
        assert!(mean.abs() < 0.05, "mean={mean}");
        assert!((var - 1.0).abs() < 0.1, "var={var}");
    }
}
