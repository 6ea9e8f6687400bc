//! Random draws consumed by the generation pipeline.

use rand::Rng;

/// The three kinds of draw a tick needs. Tests substitute scripted sources.
pub trait RandomSource {
    /// Uniform integer in `[0, max_gene]` deciding the target terrain
    fn roll(&mut self, max_gene: i32) -> i32;

    /// Uniform index in `[0, len)`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;

    /// Offspring gene drift, uniform in `{-1, 0, 1}`
    fn drift(&mut self) -> i32;

    /// Bernoulli draw used when generating terrain
    fn chance(&mut self, probability: f64) -> bool;
}

/// Adapter drawing from any [`rand::Rng`]
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll(&mut self, max_gene: i32) -> i32 {
        self.rng.gen_range(0..=max_gene)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn drift(&mut self) -> i32 {
        self.rng.gen_range(-1..=1)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_draws_stay_in_range() {
        let mut source = RngSource::new(ChaCha8Rng::seed_from_u64(42));
        for _ in 0..1000 {
            let roll = source.roll(100);
            assert!((0..=100).contains(&roll));
            assert!(source.pick(9) < 9);
            assert!((-1..=1).contains(&source.drift()));
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = RngSource::new(ChaCha8Rng::seed_from_u64(7));
        let mut b = RngSource::new(ChaCha8Rng::seed_from_u64(7));
        let draws_a: Vec<i32> = (0..32).map(|_| a.roll(100)).collect();
        let draws_b: Vec<i32> = (0..32).map(|_| b.roll(100)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_chance_extremes() {
        let mut source = RngSource::new(ChaCha8Rng::seed_from_u64(1));
        assert!(source.chance(1.0));
        assert!(!source.chance(0.0));
    }
}
