//! Alphabet Entropy Library
//!
//! Entropy and mutual information estimators over sampled data, served
//! through an HTTP API. Provides a synthetic sample generator, alphabet
//! frequency tables, and request dispatch around a swappable estimation
//! oracle.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! sampling → estimation (dispatch → oracle) → api
//!                                   ↓
//!                               metrics
//! ```
//!
//! # Design Principles
//!
//! - **Closed whitelists**: Unknown estimator names are rejected before the oracle runs
//! - **Stateless requests**: Every RNG, table and estimate is request-scoped
//! - **Typed failures**: Invalid input is a client error, never a 200 with an error body
//! - **Swappable oracle**: Dispatch depends only on the `EstimationOracle` trait
//!
//! # Example
//!
//! ```
//! use alphabet_entropy::{
//!     estimation::{EntropyDispatcher, EstimatorParams, NativeOracle},
//!     sampling::{AlphabetDistribution, SampleSpec},
//! };
//! use std::sync::Arc;
//!
//! // Seeded samples are reproducible
//! let samples = SampleSpec::default().with_seed(42).generate().unwrap();
//! let table = AlphabetDistribution::with_default_size(&samples);
//! assert_eq!(table.len(), 101);
//!
//! // Estimate entropy in bits
//! let dispatcher = EntropyDispatcher::new(Arc::new(NativeOracle::new()));
//! let estimate = dispatcher
//!     .estimate(&samples, "miller_madow", EstimatorParams::default())
//!     .unwrap();
//! assert!(estimate.entropy > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod api;
pub mod estimation;
pub mod metrics;
pub mod sampling;

// Re-export commonly used types at crate root
pub use api::{build_router, ApiError, ApiServer, AppState, ServiceConfig};
pub use estimation::{
    compute_mutual_information, shannon_entropy, EntropyDispatcher, EstimationError,
    EstimationOracle, NativeOracle,
};
pub use metrics::ServiceMetrics;
pub use sampling::{AlphabetDistribution, SampleSpec};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
