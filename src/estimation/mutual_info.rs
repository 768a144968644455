//! Mutual information dispatch.

use super::error::EstimationError;
use super::oracle::EstimationOracle;
use super::params::{EstimatorParams, MiApproach};
use serde::Serialize;

/// Mutual information result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutualInformationEstimate {
    /// Estimated mutual information in `params.base`.
    pub mutual_information: f64,
    /// Approach used.
    pub approach: MiApproach,
    /// Parameters the estimate was computed with.
    pub params: EstimatorParams,
}

/// Estimates the mutual information between paired samples `x` and `y`.
///
/// The approach is checked against the whitelist before anything else,
/// so an unsupported name never reaches the oracle.
pub fn compute_mutual_information(
    oracle: &dyn EstimationOracle,
    x: &[i64],
    y: &[i64],
    approach: &str,
    params: EstimatorParams,
) -> Result<MutualInformationEstimate, EstimationError> {
    let approach =
        MiApproach::from_name(approach).ok_or_else(|| EstimationError::UnsupportedApproach {
            name: approach.to_string(),
            measure: "mutual information",
            supported: MiApproach::names(),
        })?;

    for (field, values) in [("x", x), ("y", y)] {
        if values.is_empty() {
            return Err(EstimationError::MissingInput {
                field,
                context: "mutual information",
            });
        }
    }
    if x.len() != y.len() {
        return Err(EstimationError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let mutual_information = oracle.estimate_mutual_information(x, y, approach, &params)?;
    tracing::debug!(%approach, n = x.len(), mutual_information, "Mutual information estimate");

    Ok(MutualInformationEstimate {
        mutual_information,
        approach,
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::oracle::testing::RecordingOracle;
    use crate::estimation::oracle::OracleError;
    use crate::estimation::NativeOracle;

    fn defaults() -> EstimatorParams {
        EstimatorParams::default()
    }

    #[test]
    fn test_rejected_approach_skips_oracle() {
        let oracle = RecordingOracle::returning(1.0);
        for name in ["kernel", "ksg", "DISCRETE", ""] {
            let result =
                compute_mutual_information(&oracle, &[1, 2], &[1, 2], name, defaults());
            assert!(matches!(
                result,
                Err(EstimationError::UnsupportedApproach { .. })
            ));
        }
        assert_eq!(oracle.mi_calls(), 0);
    }

    #[test]
    fn test_approach_checked_before_inputs() {
        let oracle = RecordingOracle::returning(1.0);
        let result = compute_mutual_information(&oracle, &[], &[1], "kernel", defaults());
        assert!(matches!(
            result,
            Err(EstimationError::UnsupportedApproach { .. })
        ));
    }

    #[test]
    fn test_empty_and_mismatched_inputs() {
        let oracle = RecordingOracle::returning(1.0);
        assert!(matches!(
            compute_mutual_information(&oracle, &[], &[], "discrete", defaults()),
            Err(EstimationError::MissingInput { field: "x", .. })
        ));
        assert!(matches!(
            compute_mutual_information(&oracle, &[1], &[], "discrete", defaults()),
            Err(EstimationError::MissingInput { field: "y", .. })
        ));
        assert_eq!(
            compute_mutual_information(&oracle, &[1, 2], &[1], "metric", defaults()),
            Err(EstimationError::LengthMismatch { x_len: 2, y_len: 1 })
        );
        assert_eq!(oracle.mi_calls(), 0);
    }

    #[test]
    fn test_delegates_to_oracle() {
        let oracle = RecordingOracle::returning(0.75);
        let result =
            compute_mutual_information(&oracle, &[1, 2, 3], &[3, 2, 1], "metric", defaults())
                .unwrap();
        assert_eq!(result.mutual_information, 0.75);
        assert_eq!(result.approach, MiApproach::Metric);
        assert_eq!(oracle.mi_calls(), 1);
    }

    #[test]
    fn test_oracle_errors_propagate() {
        let result =
            compute_mutual_information(&NativeOracle, &[1, 2], &[1, 2], "metric", defaults());
        assert!(matches!(
            result,
            Err(EstimationError::Oracle(OracleError::InsufficientSamples { .. }))
        ));
    }
}
