//! The estimation oracle boundary.
//!
//! Dispatchers validate inputs and approach names, then hand the
//! numeric work to an [`EstimationOracle`]. Swapping the implementation
//! (native estimators, bindings to a statistics library, a test stub)
//! does not touch dispatch logic.

use super::params::{EntropyApproach, EstimatorParams, MiApproach};
use thiserror::Error;

/// Errors reported by an estimation oracle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("estimator '{approach}' needs at least {need} samples, got {got}")]
    InsufficientSamples {
        approach: &'static str,
        need: usize,
        got: usize,
    },
    #[error("estimator '{approach}' is undefined for this sample: {reason}")]
    Undefined {
        approach: &'static str,
        reason: String,
    },
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("estimator failure: {0}")]
    Internal(String),
}

/// Numeric entropy and mutual information estimation.
///
/// Implementations are pure: results depend only on the arguments.
pub trait EstimationOracle: Send + Sync {
    /// Estimates the entropy of `samples` in `params.base`.
    fn estimate_entropy(
        &self,
        samples: &[i64],
        approach: EntropyApproach,
        params: &EstimatorParams,
    ) -> Result<f64, OracleError>;

    /// Estimates the mutual information of paired samples in `params.base`.
    fn estimate_mutual_information(
        &self,
        x: &[i64],
        y: &[i64],
        approach: MiApproach,
        params: &EstimatorParams,
    ) -> Result<f64, OracleError>;
}
