//! Dispatch errors.

use super::oracle::OracleError;
use thiserror::Error;

/// Errors raised while validating and dispatching an estimation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("unknown mode '{0}', expected 'samples' or 'probs'")]
    UnknownMode(String),

    #[error("unsupported {measure} approach '{name}', supported: {}", supported.join(", "))]
    UnsupportedApproach {
        name: String,
        measure: &'static str,
        supported: Vec<&'static str>,
    },

    #[error("missing input '{field}' for {context}")]
    MissingInput {
        field: &'static str,
        context: &'static str,
    },

    #[error("x and y must have equal length, got {x_len} and {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
