//! HTTP surface of the estimation service.
//!
//! # Endpoints
//!
//! Domain routes, mounted under `{api_prefix}/{api_version}` (default `/api/v1`):
//! - `POST /data/alphabet/raw` - Synthetic alphabet with plug-in entropy
//! - `POST /data/alphabet/entropy` - Entropy from samples or a probability vector
//!   (`mode`, `estimator`, `base` in the query; arrays in the JSON body)
//! - `GET  /data/hello` - Liveness probe of the data domain
//! - `POST /model/entropy` - Entropy with any supported estimator
//! - `POST /model/mutual-information` - Mutual information (`discrete`, `metric`)
//! - `GET  /model/hello` - Liveness probe of the model domain
//!
//! Root routes:
//! - `GET /health` - Status, version, environment and timestamp
//! - `GET /metrics` - Prometheus scrape
//!
//! Every response carries `X-Correlation-ID` and `X-Process-Time`.
//! Errors use the [`ErrorBody`] envelope.

mod config;
mod error;
mod middleware;
mod routes;
mod server;
mod state;

pub use config::{ConfigError, Environment, LogLevel, ServiceConfig};
pub use error::{ApiError, ErrorBody};
pub use middleware::{CorrelationId, CORRELATION_ID_HEADER, PROCESS_TIME_HEADER};
pub use routes::{
    registered_domains, DomainRoutes, EntropyBody, EntropyPayload, EntropyQuery,
    MutualInformationBody, RawAlphabetQuery,
};
pub use server::{build_router, ApiServer, ServerError};
pub use state::AppState;
