//! Prometheus metrics for the estimation service.
//!
//! Exposed in Prometheus text format at `/metrics`.
//!
//! # Metrics Exposed
//!
//! ## HTTP Metrics
//! - `alphabet_entropy_http_requests_total{method,status}` - Requests served
//! - `alphabet_entropy_http_request_duration_seconds` - Request latency histogram
//!
//! ## Estimation Metrics
//! - `alphabet_entropy_estimations_total{measure,approach}` - Successful estimations
//! - `alphabet_entropy_estimation_failures_total{measure}` - Rejected or failed estimations
//!
//! # Example
//!
//! ```
//! use alphabet_entropy::metrics::{Measure, ServiceMetrics};
//!
//! let metrics = ServiceMetrics::new().expect("Failed to create registry");
//! metrics.observe_request("POST", 200, 0.004);
//! metrics.record_estimation(Measure::Entropy, "miller_madow");
//!
//! let text = metrics.encode().unwrap();
//! assert!(text.contains("alphabet_entropy_estimations_total"));
//! ```

mod collector;

pub use collector::{Measure, MetricsError, ServiceMetrics};
