//! Seeded coherent 2D noise field.
//!
//! Wraps an OpenSimplex generator so that every climate axis is a pure
//! function of `(seed, x, y)` with output guaranteed to stay in `[-1, 1]`.

use std::fmt;

use noise::{NoiseFn, OpenSimplex};

/// A deterministic, seeded source of coherent 2D noise.
///
/// Neighboring coordinates produce similar values. Sampling has no side
/// effects, so a field can be shared freely between threads.
pub struct NoiseField {
    seed: u32,
    noise: OpenSimplex,
}

impl NoiseField {
    /// Create a field for the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            noise: OpenSimplex::new(seed),
        }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the field at `(x, y)`.
    ///
    /// The raw OpenSimplex output is clamped so callers can rely on the
    /// closed `[-1, 1]` domain when writing modifier ranges.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y]).clamp(-1.0, 1.0)
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = rng.random_range(-500.0..500.0);
            let y = rng.random_range(-500.0..500.0);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_samples_stay_in_unit_range() {
        let field = NoiseField::new(1234);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10_000 {
            let x = rng.random_range(-10_000.0..10_000.0);
            let y = rng.random_range(-10_000.0..10_000.0);
            let v = field.sample(x, y);
            assert!((-1.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differing = (0..100)
            .filter(|i| {
                let x = *i as f64 * 0.37 + 0.11;
                a.sample(x, x * 0.5) != b.sample(x, x * 0.5)
            })
            .count();
        assert!(differing > 50, "only {differing} of 100 samples differ");
    }

    #[test]
    fn test_field_is_coherent() {
        let field = NoiseField::new(42);
        let mut max_step: f64 = 0.0;
        let mut prev = field.sample(0.0, 0.0);
        for i in 1..1000 {
            let v = field.sample(i as f64 * 0.01, 0.0);
            max_step = max_step.max((v - prev).abs());
            prev = v;
        }
        assert!(
            max_step < 0.2,
            "neighboring samples jumped by {max_step}, expected smooth noise"
        );
    }

    #[test]
    fn test_debug_shows_seed() {
        let field = NoiseField::new(9);
        assert_eq!(field.seed(), 9);
        assert!(format!("{field:?}").contains("seed: 9"));
    }
}
