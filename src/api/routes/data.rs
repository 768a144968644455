//! Data domain: synthetic alphabets and alphabet entropy.

use super::{record_outcome, run_blocking};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::estimation::{
    AlphabetEntropy, EntropyApproach, EntropyEstimate, EntropyRequest, EstimationError,
    EstimatorParams, LogBase,
};
use crate::metrics::Measure;
use crate::sampling::{AlphabetDistribution, AlphabetEntry, SampleSpec};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/data/hello", get(hello))
        .route("/data/alphabet/raw", post(raw_alphabet))
        .route("/data/alphabet/entropy", post(alphabet_entropy))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello world from data api", "status": "success" }))
}

/// Query parameters of `POST /data/alphabet/raw`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawAlphabetQuery {
    /// Number of samples; non-positive values give an empty sample, values
    /// above [`MAX_SAMPLES`](crate::sampling::MAX_SAMPLES) are rejected.
    pub n_samples: i64,
    /// Normal mean.
    pub mean: f64,
    /// Normal standard deviation.
    pub std: f64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for RawAlphabetQuery {
    fn default() -> Self {
        Self {
            n_samples: 320,
            mean: 50.0,
            std: 20.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Serialize)]
struct RawAlphabetResponse {
    alphabet_type: &'static str,
    total_count: usize,
    data: Vec<AlphabetEntry>,
    probs: Vec<f64>,
    entropy: f64,
    entropy_type: &'static str,
    approach: EntropyApproach,
}

async fn raw_alphabet(
    State(state): State<AppState>,
    query: Result<Query<RawAlphabetQuery>, QueryRejection>,
) -> Result<Json<RawAlphabetResponse>, ApiError> {
    let Query(query) = query?;
    let n_samples = if query.n_samples < 0 {
        0
    } else {
        usize::try_from(query.n_samples).unwrap_or(usize::MAX)
    };
    let spec = SampleSpec::normal(n_samples, query.mean, query.std).with_seed(query.seed);
    let dispatcher = state.entropy_dispatcher();

    let samples = spec.generate()?;
    let distribution = AlphabetDistribution::with_default_size(&samples);

    let result = run_blocking(move || {
        dispatcher
            .estimate(&samples, EntropyApproach::Discrete.as_str(), EstimatorParams::default())
            .map_err(ApiError::from)
    })
    .await;
    record_outcome(
        &state,
        Measure::Entropy,
        |e: &EntropyEstimate| e.approach.as_str(),
        &result,
    );
    let estimate = result?;

    Ok(Json(RawAlphabetResponse {
        alphabet_type: "raw",
        total_count: distribution.total_count(),
        probs: distribution.probs(),
        data: distribution.into_entries(),
        entropy: estimate.entropy,
        entropy_type: "samples",
        approach: estimate.approach,
    }))
}

/// Query parameters of `POST /data/alphabet/entropy`.
///
/// Each takes precedence over the same field in the JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntropyQuery {
    /// `samples` or `probs`.
    pub mode: Option<String>,
    /// Estimator name for `samples` mode.
    pub estimator: Option<String>,
    /// Logarithm base of the result.
    pub base: Option<LogBase>,
}

/// JSON body of `POST /data/alphabet/entropy`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntropyPayload {
    /// Sample sequence for `samples` mode.
    pub samples: Option<Vec<i64>>,
    /// Probability vector for `probs` mode.
    pub probs: Option<Vec<f64>>,
    /// Mode, when not given in the query.
    pub mode: Option<String>,
    /// Estimator, when not given in the query.
    pub estimator: Option<String>,
    /// Base, when not given in the query.
    pub base: Option<LogBase>,
}

impl EntropyPayload {
    fn into_request(self, query: EntropyQuery) -> Result<EntropyRequest, EstimationError> {
        let mode = query
            .mode
            .or(self.mode)
            .ok_or(EstimationError::MissingInput {
                field: "mode",
                context: "alphabet entropy",
            })?;
        Ok(EntropyRequest {
            mode,
            samples: self.samples,
            probs: self.probs,
            estimator: query
                .estimator
                .or(self.estimator)
                .unwrap_or_else(|| EntropyApproach::Discrete.as_str().to_string()),
            base: query.base.or(self.base).unwrap_or_default(),
        })
    }
}

async fn alphabet_entropy(
    State(state): State<AppState>,
    query: Result<Query<EntropyQuery>, QueryRejection>,
    body: Result<Json<EntropyPayload>, JsonRejection>,
) -> Result<Json<AlphabetEntropy>, ApiError> {
    let Query(query) = query?;
    let payload = match body {
        Ok(Json(payload)) => payload,
        // No JSON body at all: the query alone describes the request.
        Err(JsonRejection::MissingJsonContentType(_)) => EntropyPayload::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let request = payload.into_request(query)?;
    let dispatcher = state.entropy_dispatcher();

    let result = run_blocking(move || dispatcher.dispatch(&request).map_err(ApiError::from)).await;
    record_outcome(
        &state,
        Measure::Entropy,
        |r: &AlphabetEntropy| match r {
            AlphabetEntropy::Sample { estimator, .. } => estimator.as_str(),
            AlphabetEntropy::Probability { .. } => "shannon",
        },
        &result,
    );

    result.map(Json)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::estimation::testing::RecordingOracle;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_hello() {
        let response = send(native_app(), get("/api/v1/data/hello")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-correlation-id"));
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "hello world from data api");
    }

    #[tokio::test]
    async fn test_raw_alphabet_defaults() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/data/alphabet/raw")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["alphabet_type"], "raw");
        assert_eq!(body["total_count"], 320);
        assert_eq!(body["entropy_type"], "samples");
        assert_eq!(body["approach"], "discrete");
        assert_eq!(body["data"].as_array().unwrap().len(), 101);
        assert_eq!(body["probs"].as_array().unwrap().len(), 101);

        let counted: u64 = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["count"].as_u64().unwrap())
            .sum();
        assert_eq!(counted, 320);

        let entropy = body["entropy"].as_f64().unwrap();
        assert!(entropy > 0.0 && entropy <= 101f64.log2());
    }

    #[tokio::test]
    async fn test_raw_alphabet_is_reproducible() {
        let uri = "/api/v1/data/alphabet/raw?n_samples=50&mean=30&std=5&seed=7";
        let first = json_body(send(native_app(), post_json(uri, json!({}))).await).await;
        let second = json_body(send(native_app(), post_json(uri, json!({}))).await).await;
        assert_eq!(first, second);
        assert_eq!(first["total_count"], 50);
    }

    #[tokio::test]
    async fn test_raw_alphabet_rejects_negative_std() {
        let request = post_json("/api/v1/data/alphabet/raw?std=-1", json!({}));
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "INVALID_PARAMETER");
        assert!(body["correlation_id"].is_string());
    }

    #[tokio::test]
    async fn test_raw_alphabet_rejects_oversized_request() {
        let request = post_json("/api/v1/data/alphabet/raw?n_samples=100000000000", json!({}));
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn test_raw_alphabet_bad_query() {
        let request = post_json("/api/v1/data/alphabet/raw?n_samples=many", json!({}));
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_entropy_probs_mode() {
        let request = post_json(
            "/api/v1/data/alphabet/entropy",
            json!({ "mode": "probs", "probs": [0.5, 0.5] }),
        );
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["entropy_type"], "probability");
        assert_eq!(body["definition"], "Shannon");
        assert_eq!(body["alphabet_size"], 2);
        assert!((body["entropy"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_entropy_mode_in_query_arrays_in_body() {
        let request = post_json(
            "/api/v1/data/alphabet/entropy?mode=probs&base=e",
            json!({ "probs": [0.5, 0.5] }),
        );
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["entropy_type"], "probability");
        assert!((body["entropy"].as_f64().unwrap() - std::f64::consts::LN_2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_entropy_query_overrides_body() {
        let oracle = Arc::new(RecordingOracle::returning(1.5));
        let request = post_json(
            "/api/v1/data/alphabet/entropy?mode=samples&estimator=miller_madow",
            json!({ "mode": "probs", "samples": [4, 4, 5], "estimator": "grassberger" }),
        );
        let response = send(app_with(oracle.clone()), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["entropy_type"], "sample");
        assert_eq!(body["estimator"], "miller_madow");
        assert_eq!(oracle.entropy_calls(), 1);
    }

    #[tokio::test]
    async fn test_entropy_without_body_uses_query() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/data/alphabet/entropy?mode=bogus")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "UNKNOWN_MODE");
    }

    #[tokio::test]
    async fn test_entropy_overflowing_probs_is_unprocessable() {
        let request = post_json(
            "/api/v1/data/alphabet/entropy?mode=probs",
            json!({ "probs": [1.7e308, 1.7e308] }),
        );
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error_code"], "ESTIMATION_FAILED");
    }

    #[tokio::test]
    async fn test_entropy_missing_mode() {
        let request = post_json("/api/v1/data/alphabet/entropy", json!({ "probs": [1.0] }));
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error_code"], "MISSING_INPUT");
        assert_eq!(body["details"]["field"], "mode");
    }

    #[tokio::test]
    async fn test_entropy_samples_mode() {
        let oracle = Arc::new(RecordingOracle::returning(2.5));
        let request = post_json(
            "/api/v1/data/alphabet/entropy",
            json!({ "mode": "samples", "samples": [1, 2, 3, 3], "estimator": "grassberger" }),
        );
        let response = send(app_with(oracle.clone()), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(
            body,
            json!({
                "entropy_type": "sample",
                "entropy": 2.5,
                "estimator": "grassberger",
                "sample_size": 4
            })
        );
        assert_eq!(oracle.entropy_calls(), 1);
    }

    #[tokio::test]
    async fn test_entropy_unknown_mode_is_client_error() {
        let request = post_json("/api/v1/data/alphabet/entropy", json!({ "mode": "bogus" }));
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error_code"], "UNKNOWN_MODE");
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_entropy_missing_samples() {
        let request = post_json(
            "/api/v1/data/alphabet/entropy",
            json!({ "mode": "samples", "samples": [] }),
        );
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "MISSING_INPUT");
    }

    #[tokio::test]
    async fn test_entropy_unsupported_estimator() {
        let oracle = Arc::new(RecordingOracle::returning(0.0));
        let request = post_json(
            "/api/v1/data/alphabet/entropy",
            json!({ "mode": "samples", "samples": [1, 2], "estimator": "zhang" }),
        );
        let response = send(app_with(oracle.clone()), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "UNSUPPORTED_APPROACH");
        assert_eq!(oracle.entropy_calls(), 0);
    }

    #[tokio::test]
    async fn test_entropy_malformed_json() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/data/alphabet/entropy")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let response = send(native_app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "BAD_REQUEST");
    }
}
