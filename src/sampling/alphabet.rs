//! Per-symbol frequency tables over a fixed integer alphabet.

use serde::{Deserialize, Serialize};

/// Default alphabet size (symbols `0..=100`).
pub const DEFAULT_ALPHABET_SIZE: usize = 101;

/// Count and empirical probability of one alphabet symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphabetEntry {
    /// Symbol index in `[0, alphabet_size)`.
    pub letter: usize,
    /// Occurrences of the symbol.
    pub count: usize,
    /// `count / total`, or `0.0` for an empty sample.
    pub prob: f64,
}

/// Frequency table spanning the whole alphabet.
///
/// Symbols outside `[0, alphabet_size)` are not counted. They still
/// contribute to `total_count`, so probabilities of in-range symbols
/// sum to less than one when anything was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphabetDistribution {
    entries: Vec<AlphabetEntry>,
    total: usize,
    out_of_range: usize,
}

impl AlphabetDistribution {
    /// Builds the table for `samples` over `alphabet_size` symbols.
    pub fn build(samples: &[i64], alphabet_size: usize) -> Self {
        let mut counts = vec![0usize; alphabet_size];
        let mut out_of_range = 0usize;

        for &sample in samples {
            match usize::try_from(sample) {
                Ok(idx) if idx < alphabet_size => counts[idx] += 1,
                _ => out_of_range += 1,
            }
        }

        if out_of_range > 0 {
            tracing::debug!(
                out_of_range,
                alphabet_size,
                "Ignored samples outside the alphabet"
            );
        }

        let total = samples.len();
        let entries = counts
            .into_iter()
            .enumerate()
            .map(|(letter, count)| AlphabetEntry {
                letter,
                count,
                prob: if total > 0 {
                    count as f64 / total as f64
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            entries,
            total,
            out_of_range,
        }
    }

    /// Builds the table over the default 101-symbol alphabet.
    pub fn with_default_size(samples: &[i64]) -> Self {
        Self::build(samples, DEFAULT_ALPHABET_SIZE)
    }

    /// Entries in ascending symbol order.
    pub fn entries(&self) -> &[AlphabetEntry] {
        &self.entries
    }

    /// Probabilities in ascending symbol order.
    pub fn probs(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.prob).collect()
    }

    /// Number of input samples, including ignored ones.
    pub fn total_count(&self) -> usize {
        self.total
    }

    /// Number of input samples that fell outside the alphabet.
    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    /// Alphabet size.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the table and returns its entries.
    pub fn into_entries(self) -> Vec<AlphabetEntry> {
        self.entries
    }
}
