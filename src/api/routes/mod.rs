//! Route sets.
//!
//! Domain routes are listed explicitly in [`registered_domains`] and
//! mounted under the configured API base path. Health and metrics routes
//! are mounted at the root.

mod data;
mod health;
mod model;

use super::error::ApiError;
use super::state::AppState;
use crate::metrics::Measure;
use axum::Router;

pub use data::{EntropyPayload, EntropyQuery, RawAlphabetQuery};
pub use model::{EntropyBody, MutualInformationBody};

/// A named group of domain routes.
pub struct DomainRoutes {
    /// Domain name, used in logs.
    pub name: &'static str,
    /// Builds the domain router (paths relative to the API base path).
    pub router: fn() -> Router<AppState>,
}

const DOMAINS: &[DomainRoutes] = &[
    DomainRoutes {
        name: "data",
        router: data::router,
    },
    DomainRoutes {
        name: "model",
        router: model::router,
    },
];

/// Every domain route set, in mount order.
pub fn registered_domains() -> &'static [DomainRoutes] {
    DOMAINS
}

/// Unprefixed operational routes (`/health`, `/metrics`).
pub fn operational_routes() -> Router<AppState> {
    health::router()
}

/// Fallback for unmatched paths.
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

/// Runs blocking estimation work off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

/// Counts the outcome of an estimation.
fn record_outcome<T, E>(
    state: &AppState,
    measure: Measure,
    approach: impl FnOnce(&T) -> &'static str,
    result: &Result<T, E>,
) {
    match result {
        Ok(value) => state.metrics.record_estimation(measure, approach(value)),
        Err(_) => state.metrics.record_failure(measure),
    }
}
