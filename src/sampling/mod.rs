//! Synthetic sample generation and alphabet histograms.
//!
//! Samples are integer observations; the alphabet builder turns them
//! into a full-length frequency table for visualization and for
//! closed-form entropy over probabilities.

mod alphabet;
mod generator;

pub use alphabet::{AlphabetDistribution, AlphabetEntry, DEFAULT_ALPHABET_SIZE};
pub use generator::{SampleSpec, SamplingError, MAX_SAMPLES};
