//! Synthetic integer samples from a clipped normal distribution.
//!
//! Every call builds its own ChaCha20 generator. Seeded calls are
//! reproducible; unseeded calls draw their seed from the OS.

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest batch a single spec may request.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Errors that can occur while generating samples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// Negative, NaN or infinite standard deviation.
    #[error("standard deviation must be finite and non-negative, got {0}")]
    InvalidStdDev(f64),
    /// NaN or infinite mean.
    #[error("mean must be finite, got {0}")]
    InvalidMean(f64),
    /// Clamp bounds in the wrong order.
    #[error("lower bound {low} exceeds upper bound {high}")]
    InvalidBounds { low: i64, high: i64 },
    /// More samples than [`MAX_SAMPLES`].
    #[error("n_samples must be at most {max}, got {requested}")]
    TooManySamples { requested: usize, max: usize },
}

/// Parameters for a batch of discretized normal samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    /// Number of samples to draw.
    pub n_samples: usize,
    /// Mean of the underlying normal distribution.
    pub mean: f64,
    /// Standard deviation of the underlying normal distribution.
    pub std: f64,
    /// Inclusive lower clamp bound.
    pub low: i64,
    /// Inclusive upper clamp bound.
    pub high: i64,
    /// Optional seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            n_samples: 320,
            mean: 50.0,
            std: 20.0,
            low: 0,
            high: 100,
            seed: None,
        }
    }
}

impl SampleSpec {
    /// Creates a spec with the given count and distribution, default bounds.
    pub fn normal(n_samples: usize, mean: f64, std: f64) -> Self {
        Self {
            n_samples,
            mean,
            std,
            ..Default::default()
        }
    }

    /// Sets the inclusive clamp bounds.
    pub fn with_bounds(mut self, low: i64, high: i64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the sample count, distribution parameters and bounds.
    pub fn validate(&self) -> Result<(), SamplingError> {
        if self.n_samples > MAX_SAMPLES {
            return Err(SamplingError::TooManySamples {
                requested: self.n_samples,
                max: MAX_SAMPLES,
            });
        }
        if !self.std.is_finite() || self.std < 0.0 {
            return Err(SamplingError::InvalidStdDev(self.std));
        }
        if !self.mean.is_finite() {
            return Err(SamplingError::InvalidMean(self.mean));
        }
        if self.low > self.high {
            return Err(SamplingError::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    /// Draws the samples.
    ///
    /// Each draw is rounded half-to-even and then clamped into
    /// `[low, high]`.
    pub fn generate(&self) -> Result<Vec<i64>, SamplingError> {
        self.validate()?;

        let normal =
            Normal::new(self.mean, self.std).map_err(|_| SamplingError::InvalidStdDev(self.std))?;
        let mut rng = match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        let (low, high) = (self.low as f64, self.high as f64);
        let samples: Vec<i64> = (0..self.n_samples)
            .map(|_| discretize(normal.sample(&mut rng), low, high))
            .collect();

        tracing::debug!(
            n_samples = self.n_samples,
            mean = self.mean,
            std = self.std,
            seeded = self.seed.is_some(),
            "Generated normal integer samples"
        );

        Ok(samples)
    }
}

#[inline]
fn discretize(draw: f64, low: f64, high: f64) -> i64 {
    draw.round_ties_even().clamp(low, high) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_count_is_capped() {
        assert!(SampleSpec::normal(MAX_SAMPLES, 50.0, 20.0).validate().is_ok());
        assert_eq!(
            SampleSpec::normal(MAX_SAMPLES + 1, 50.0, 20.0).generate(),
            Err(SamplingError::TooManySamples {
                requested: MAX_SAMPLES + 1,
                max: MAX_SAMPLES,
            })
        );
    }

    #[test]
    fn test_same_seed_same_samples() {
        let spec = SampleSpec::default().with_seed(42);
        assert_eq!(spec.generate().unwrap(), spec.generate().unwrap());
    }

    #[test]
    fn test_different_seed_different_samples() {
        let a = SampleSpec::default().with_seed(1).generate().unwrap();
        let b = SampleSpec::default().with_seed(2).generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unseeded_calls_differ() {
        let spec = SampleSpec::normal(320, 50.0, 20.0);
        let a = spec.generate().unwrap();
        let b = spec.generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_samples_is_empty() {
        let samples = SampleSpec::normal(0, 50.0, 20.0).generate().unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_default_count() {
        let samples = SampleSpec::default().with_seed(7).generate().unwrap();
        assert_eq!(samples.len(), 320);
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        assert_eq!(discretize(2.5, 0.0, 100.0), 2);
        assert_eq!(discretize(3.5, 0.0, 100.0), 4);
        assert_eq!(discretize(2.4999, 0.0, 100.0), 2);
        assert_eq!(discretize(2.5001, 0.0, 100.0), 3);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(discretize(-7.2, 0.0, 100.0), 0);
        assert_eq!(discretize(250.0, 0.0, 100.0), 100);
    }

    #[test]
    fn test_zero_std_is_constant() {
        let samples = SampleSpec::normal(50, 12.0, 0.0).with_seed(3).generate().unwrap();
        assert!(samples.iter().all(|&s| s == 12));
    }

    #[test]
    fn test_negative_std_rejected() {
        assert!(matches!(
            SampleSpec::normal(10, 0.0, -1.0).generate(),
            Err(SamplingError::InvalidStdDev(_))
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let spec = SampleSpec::default().with_bounds(10, 5);
        assert!(matches!(
            spec.generate(),
            Err(SamplingError::InvalidBounds { low: 10, high: 5 })
        ));
    }

    proptest! {
        #[test]
        fn prop_samples_within_bounds(
            n in 0usize..500,
            mean in -200.0f64..200.0,
            std in 0.0f64..150.0,
            low in -50i64..50,
            width in 0i64..100,
            seed in any::<u64>(),
        ) {
            let high = low + width;
            let samples = SampleSpec::normal(n, mean, std)
                .with_bounds(low, high)
                .with_seed(seed)
                .generate()
                .unwrap();
            prop_assert_eq!(samples.len(), n);
            prop_assert!(samples.iter().all(|&s| s >= low && s <= high));
        }

        #[test]
        fn prop_seeded_generation_is_idempotent(seed in any::<u64>(), n in 0usize..200) {
            let spec = SampleSpec::normal(n, 50.0, 20.0).with_seed(seed);
            prop_assert_eq!(spec.generate().unwrap(), spec.generate().unwrap());
        }
    }
}
