//! Shared, immutable handler state.

use super::config::ServiceConfig;
use crate::estimation::{EntropyDispatcher, EstimationOracle, NativeOracle};
use crate::metrics::{MetricsError, ServiceMetrics};
use std::sync::Arc;

/// State handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration.
    pub config: Arc<ServiceConfig>,
    /// Numeric estimation backend.
    pub oracle: Arc<dyn EstimationOracle>,
    /// Prometheus registry.
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Builds state around an explicit oracle.
    pub fn new(
        config: ServiceConfig,
        oracle: Arc<dyn EstimationOracle>,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            config: Arc::new(config),
            oracle,
            metrics: Arc::new(ServiceMetrics::new()?),
        })
    }

    /// Builds state with the in-crate [`NativeOracle`].
    pub fn with_native_oracle(config: ServiceConfig) -> Result<Self, MetricsError> {
        Self::new(config, Arc::new(NativeOracle::new()))
    }

    /// Entropy dispatcher over this state's oracle.
    pub fn entropy_dispatcher(&self) -> EntropyDispatcher {
        EntropyDispatcher::new(Arc::clone(&self.oracle))
    }
}
