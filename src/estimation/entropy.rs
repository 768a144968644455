//! Entropy dispatch.
//!
//! Two request shapes are served here:
//!
//! - the model domain, [`EntropyDispatcher::estimate`], which takes samples,
//!   an approach name and estimator parameters and reports the entropy
//!   family (`shannon` or `differential`);
//! - the data domain, [`EntropyDispatcher::dispatch`], which switches on a
//!   `mode` of `samples` (oracle estimate) or `probs` (closed-form Shannon
//!   entropy of a probability vector).
//!
//! Approach names are resolved against a closed whitelist before the
//! oracle is consulted.

use super::error::EstimationError;
use super::oracle::{EstimationOracle, OracleError};
use super::params::{EntropyApproach, EstimatorFamily, EstimatorParams, LogBase};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of entropy a result reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyType {
    /// Histogram estimate over a discrete alphabet.
    Shannon,
    /// Density estimate over a continuous support.
    Differential,
    /// Estimate from a sample sequence (data domain).
    Sample,
    /// Closed form from a probability vector (data domain).
    Probability,
}

impl EntropyType {
    fn of(approach: EntropyApproach) -> Self {
        match approach.family() {
            EstimatorFamily::Discrete => EntropyType::Shannon,
            EstimatorFamily::Continuous => EntropyType::Differential,
        }
    }
}

/// Model-domain entropy result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyEstimate {
    /// Estimated entropy in `params.base`.
    pub entropy: f64,
    /// Approach used.
    pub approach: EntropyApproach,
    /// `shannon` or `differential`.
    pub entropy_type: EntropyType,
    /// Parameters the estimate was computed with.
    pub params: EstimatorParams,
}

/// Data-domain entropy request.
#[derive(Debug, Clone, Deserialize)]
pub struct EntropyRequest {
    /// `samples` or `probs`.
    pub mode: String,
    /// Sample sequence for `samples` mode.
    #[serde(default)]
    pub samples: Option<Vec<i64>>,
    /// Probability vector for `probs` mode.
    #[serde(default)]
    pub probs: Option<Vec<f64>>,
    /// Estimator name for `samples` mode.
    #[serde(default = "default_estimator")]
    pub estimator: String,
    /// Logarithm base of the result.
    #[serde(default)]
    pub base: LogBase,
}

fn default_estimator() -> String {
    EntropyApproach::Discrete.as_str().to_string()
}

/// Data-domain entropy result, tagged by `entropy_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entropy_type", rename_all = "lowercase")]
pub enum AlphabetEntropy {
    /// Oracle estimate from samples.
    Sample {
        /// Estimated entropy.
        entropy: f64,
        /// Estimator used.
        estimator: EntropyApproach,
        /// Number of samples.
        sample_size: usize,
    },
    /// Shannon entropy of a probability vector.
    Probability {
        /// Entropy.
        entropy: f64,
        /// Always `"Shannon"`.
        definition: &'static str,
        /// Length of the probability vector.
        alphabet_size: usize,
    },
}

impl AlphabetEntropy {
    /// Entropy value regardless of mode.
    pub fn entropy(&self) -> f64 {
        match self {
            AlphabetEntropy::Sample { entropy, .. }
            | AlphabetEntropy::Probability { entropy, .. } => *entropy,
        }
    }
}

/// Routes entropy requests to the oracle or the closed-form path.
#[derive(Clone)]
pub struct EntropyDispatcher {
    oracle: Arc<dyn EstimationOracle>,
}

impl EntropyDispatcher {
    /// Creates a dispatcher over `oracle`.
    pub fn new(oracle: Arc<dyn EstimationOracle>) -> Self {
        Self { oracle }
    }

    /// Estimates the entropy of `samples` with the named approach.
    pub fn estimate(
        &self,
        samples: &[i64],
        approach: &str,
        params: EstimatorParams,
    ) -> Result<EntropyEstimate, EstimationError> {
        let approach = resolve_approach(approach)?;
        if samples.is_empty() {
            return Err(EstimationError::MissingInput {
                field: "data",
                context: "entropy estimation",
            });
        }

        let entropy = self.oracle.estimate_entropy(samples, approach, &params)?;
        tracing::debug!(%approach, n = samples.len(), entropy, "Entropy estimate");

        Ok(EntropyEstimate {
            entropy,
            approach,
            entropy_type: EntropyType::of(approach),
            params,
        })
    }

    /// Serves a data-domain request according to its mode.
    pub fn dispatch(&self, request: &EntropyRequest) -> Result<AlphabetEntropy, EstimationError> {
        let result = self.dispatch_mode(request)?;
        tracing::debug!(mode = %request.mode, entropy = result.entropy(), "Alphabet entropy");
        Ok(result)
    }

    fn dispatch_mode(&self, request: &EntropyRequest) -> Result<AlphabetEntropy, EstimationError> {
        match request.mode.as_str() {
            "samples" => {
                let estimator = resolve_approach(&request.estimator)?;
                let samples = non_empty(request.samples.as_deref(), "samples", "mode 'samples'")?;
                let params = EstimatorParams::with_base(request.base);
                let entropy = self.oracle.estimate_entropy(samples, estimator, &params)?;

                Ok(AlphabetEntropy::Sample {
                    entropy,
                    estimator,
                    sample_size: samples.len(),
                })
            }
            "probs" => {
                let probs = non_empty(request.probs.as_deref(), "probs", "mode 'probs'")?;
                let entropy = shannon_entropy(probs, request.base);
                if !entropy.is_finite() {
                    return Err(OracleError::Undefined {
                        approach: "shannon",
                        reason: format!("probability vector entropy is {entropy}"),
                    }
                    .into());
                }
                Ok(AlphabetEntropy::Probability {
                    entropy,
                    definition: "Shannon",
                    alphabet_size: probs.len(),
                })
            }
            other => Err(EstimationError::UnknownMode(other.to_string())),
        }
    }
}

/// Shannon entropy `-Σ p log p` of a probability vector.
///
/// Entries that are not strictly positive (zeros, negatives, NaN) are
/// skipped. The vector is not renormalised.
pub fn shannon_entropy(probs: &[f64], base: LogBase) -> f64 {
    let sum: f64 = probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * base.log(p))
        .sum();
    0.0 - sum
}

fn resolve_approach(name: &str) -> Result<EntropyApproach, EstimationError> {
    EntropyApproach::from_name(name).ok_or_else(|| EstimationError::UnsupportedApproach {
        name: name.to_string(),
        measure: "entropy",
        supported: EntropyApproach::names(),
    })
}

fn non_empty<'a, T>(
    values: Option<&'a [T]>,
    field: &'static str,
    context: &'static str,
) -> Result<&'a [T], EstimationError> {
    match values {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EstimationError::MissingInput { field, context }),
    }
}
