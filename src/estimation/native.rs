//! In-process implementation of the estimation oracle.

use super::continuous;
use super::discrete::{self, Histogram};
use super::oracle::{EstimationOracle, OracleError};
use super::params::{EntropyApproach, EstimatorParams, MiApproach};

/// Estimators implemented natively in this crate.
///
/// Values are computed in nats and converted to `params.base`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeOracle;

impl NativeOracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }
}

impl EstimationOracle for NativeOracle {
    fn estimate_entropy(
        &self,
        samples: &[i64],
        approach: EntropyApproach,
        params: &EstimatorParams,
    ) -> Result<f64, OracleError> {
        let name = approach.as_str();
        require_samples(name, samples.len(), 1)?;

        let nats = match approach {
            EntropyApproach::Kernel => {
                let bandwidth = params.bandwidth_or_default();
                if !(bandwidth.is_finite() && bandwidth > 0.0) {
                    return Err(OracleError::InvalidParameter {
                        name: "bandwidth",
                        reason: format!("must be positive and finite, got {bandwidth}"),
                    });
                }
                continuous::kernel_entropy(&to_f64(samples), bandwidth, params.kernel_or_default())
            }
            EntropyApproach::Metric => {
                let k = neighbour_rank(params)?;
                require_samples(name, samples.len(), k.saturating_add(1))?;
                continuous::kozachenko_leonenko(&to_f64(samples), k)?
            }
            discrete_approach => {
                let support = support_override(params)?;
                let hist = Histogram::from_samples(samples);
                match discrete_approach {
                    EntropyApproach::MillerMadow => discrete::miller_madow(&hist),
                    EntropyApproach::Grassberger => discrete::grassberger(&hist),
                    EntropyApproach::ChaoShen => discrete::chao_shen(&hist),
                    EntropyApproach::ChaoWangJost => discrete::chao_wang_jost(&hist),
                    EntropyApproach::Bonachela => discrete::bonachela(&hist),
                    EntropyApproach::Shrink => discrete::shrink(&hist),
                    EntropyApproach::Nsb => discrete::nsb(&hist, support)?,
                    EntropyApproach::Ansb => discrete::ansb(&hist, support)?,
                    _ => discrete::plugin(&hist),
                }
            }
        };

        tracing::trace!(approach = name, n = samples.len(), nats, "Entropy estimated");
        finite(name, params.base.from_nats(nats))
    }

    fn estimate_mutual_information(
        &self,
        x: &[i64],
        y: &[i64],
        approach: MiApproach,
        params: &EstimatorParams,
    ) -> Result<f64, OracleError> {
        let name = approach.as_str();
        if x.len() != y.len() {
            return Err(OracleError::InvalidParameter {
                name: "y",
                reason: format!("length {} differs from x length {}", y.len(), x.len()),
            });
        }
        require_samples(name, x.len(), 1)?;

        let nats = match approach {
            MiApproach::Discrete => {
                let joint: Vec<(i64, i64)> = x.iter().copied().zip(y.iter().copied()).collect();
                discrete::plugin(&Histogram::from_samples(x))
                    + discrete::plugin(&Histogram::from_samples(y))
                    - discrete::plugin(&Histogram::from_samples(&joint))
            }
            MiApproach::Metric => {
                let k = neighbour_rank(params)?;
                require_samples(name, x.len(), k.saturating_add(1))?;
                continuous::ksg_mutual_information(&to_f64(x), &to_f64(y), k)
            }
        };

        tracing::trace!(approach = name, n = x.len(), nats, "Mutual information estimated");
        finite(name, params.base.from_nats(nats))
    }
}

fn require_samples(approach: &'static str, got: usize, need: usize) -> Result<(), OracleError> {
    if got < need {
        return Err(OracleError::InsufficientSamples { approach, need, got });
    }
    Ok(())
}

fn neighbour_rank(params: &EstimatorParams) -> Result<usize, OracleError> {
    match params.k_or_default() {
        0 => Err(OracleError::InvalidParameter {
            name: "k",
            reason: "must be at least 1".to_string(),
        }),
        k => Ok(k),
    }
}

fn support_override(params: &EstimatorParams) -> Result<Option<usize>, OracleError> {
    match params.k_support {
        Some(0) => Err(OracleError::InvalidParameter {
            name: "k_support",
            reason: "must be at least 1".to_string(),
        }),
        other => Ok(other),
    }
}

fn finite(approach: &'static str, value: f64) -> Result<f64, OracleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OracleError::Undefined {
            approach,
            reason: format!("estimate is not finite ({value})"),
        })
    }
}

fn to_f64(samples: &[i64]) -> Vec<f64> {
    samples.iter().map(|&s| s as f64).collect()
}
