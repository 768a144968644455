//! Model domain: entropy and mutual information estimators.

use super::{record_outcome, run_blocking};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::estimation::{
    compute_mutual_information, EntropyEstimate, EstimatorParams, MutualInformationEstimate,
};
use crate::metrics::Measure;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/model/hello", get(hello))
        .route("/model/entropy", post(entropy))
        .route("/model/mutual-information", post(mutual_information))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello world from model api", "status": "success" }))
}

/// Body of `POST /model/entropy`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntropyBody {
    /// Sample sequence.
    #[serde(default)]
    pub data: Vec<i64>,
    /// Estimator name.
    #[serde(default = "default_approach")]
    pub approach: String,
    /// Estimator parameters.
    #[serde(default)]
    pub params: EstimatorParams,
}

/// Body of `POST /model/mutual-information`.
#[derive(Debug, Clone, Deserialize)]
pub struct MutualInformationBody {
    /// First variable.
    #[serde(default)]
    pub x: Vec<i64>,
    /// Second variable, paired with `x`.
    #[serde(default)]
    pub y: Vec<i64>,
    /// Estimator name.
    #[serde(default = "default_approach")]
    pub approach: String,
    /// Estimator parameters.
    #[serde(default)]
    pub params: EstimatorParams,
}

fn default_approach() -> String {
    "discrete".to_string()
}

async fn entropy(
    State(state): State<AppState>,
    body: Result<Json<EntropyBody>, JsonRejection>,
) -> Result<Json<EntropyEstimate>, ApiError> {
    let Json(body) = body?;
    let dispatcher = state.entropy_dispatcher();

    let result = run_blocking(move || {
        dispatcher
            .estimate(&body.data, &body.approach, body.params)
            .map_err(ApiError::from)
    })
    .await;
    record_outcome(
        &state,
        Measure::Entropy,
        |e: &EntropyEstimate| e.approach.as_str(),
        &result,
    );

    result.map(Json)
}

async fn mutual_information(
    State(state): State<AppState>,
    body: Result<Json<MutualInformationBody>, JsonRejection>,
) -> Result<Json<MutualInformationEstimate>, ApiError> {
    let Json(body) = body?;
    let oracle = state.oracle.clone();

    let result = run_blocking(move || {
        compute_mutual_information(oracle.as_ref(), &body.x, &body.y, &body.approach, body.params)
            .map_err(ApiError::from)
    })
    .await;
    record_outcome(
        &state,
        Measure::MutualInformation,
        |e: &MutualInformationEstimate| e.approach.as_str(),
        &result,
    );

    result.map(Json)
}
