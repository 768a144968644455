//! Metrics collection and registry.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Which estimation family a counter refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Entropy estimation.
    Entropy,
    /// Mutual information estimation.
    MutualInformation,
}

impl Measure {
    fn label(self) -> &'static str {
        match self {
            Measure::Entropy => "entropy",
            Measure::MutualInformation => "mutual_information",
        }
    }
}

/// Prometheus metrics for the HTTP service.
pub struct ServiceMetrics {
    registry: Registry,

    // HTTP metrics
    http_requests_total: IntCounterVec,
    http_request_duration: Histogram,

    // Estimation metrics
    estimations_total: IntCounterVec,
    estimation_failures_total: IntCounterVec,
}

impl ServiceMetrics {
    /// Creates a registry with all service metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "alphabet_entropy_http_requests_total",
                "Total HTTP requests by method and status",
            ),
            &["method", "status"],
        )?;
        let http_request_duration = Histogram::with_opts(HistogramOpts::new(
            "alphabet_entropy_http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;

        let estimations_total = IntCounterVec::new(
            Opts::new(
                "alphabet_entropy_estimations_total",
                "Successful estimations by measure and approach",
            ),
            &["measure", "approach"],
        )?;
        let estimation_failures_total = IntCounterVec::new(
            Opts::new(
                "alphabet_entropy_estimation_failures_total",
                "Rejected or failed estimations by measure",
            ),
            &["measure"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(estimations_total.clone()))?;
        registry.register(Box::new(estimation_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            estimations_total,
            estimation_failures_total,
        })
    }

    /// Records a completed HTTP request.
    pub fn observe_request(&self, method: &str, status: u16, seconds: f64) {
        self.http_requests_total
            .with_label_values(&[method, &status.to_string()])
            .inc();
        self.http_request_duration.observe(seconds);
    }

    /// Records a successful estimation.
    pub fn record_estimation(&self, measure: Measure, approach: &str) {
        self.estimations_total
            .with_label_values(&[measure.label(), approach])
            .inc();
    }

    /// Records a rejected or failed estimation.
    pub fn record_failure(&self, measure: Measure) {
        self.estimation_failures_total
            .with_label_values(&[measure.label()])
            .inc();
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
