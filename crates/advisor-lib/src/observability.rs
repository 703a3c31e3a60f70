//! Observability infrastructure for the fertilizer advisor
//!
//! Provides:
//! - Prometheus metrics (prediction latency, outcomes, asset state)
//! - Structured JSON logging with tracing

use crate::assets::{AssetPaths, Assets};
use crate::error::{LoadError, PredictError};
use crate::models::{CategoricalField, Recommendation};
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter_vec, register_int_gauge,
    GaugeVec, Histogram, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AdvisorMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct AdvisorMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounterVec,
    assets_loaded: IntGauge,
    model_info: GaugeVec,
}

impl AdvisorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "fertilizer_advisor_prediction_latency_seconds",
                "Time spent validating, encoding and classifying a request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "fertilizer_advisor_predictions_total",
                "Recommendations served, by fertilizer",
                &["fertilizer"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "fertilizer_advisor_prediction_errors_total",
                "Rejected or failed prediction requests, by error kind",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            assets_loaded: register_int_gauge!(
                "fertilizer_advisor_assets_loaded",
                "1 when the classifier and encoders are loaded, 0 in degraded mode"
            )
            .expect("Failed to register assets_loaded"),

            model_info: register_gauge_vec!(
                "fertilizer_advisor_model_info",
                "Information about the loaded classifier",
                &["format", "sha256"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Advisor metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct AdvisorMetrics {
    _private: (),
}

impl Default for AdvisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AdvisorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, fertilizer: &str) {
        self.inner()
            .predictions_total
            .with_label_values(&[fertilizer])
            .inc();
    }

    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Publish the asset state; clears model info in degraded mode
    pub fn set_assets(&self, assets: Option<&Assets>) {
        let inner = self.inner();
        inner.model_info.reset();

        match assets {
            Some(assets) => {
                inner.assets_loaded.set(1);
                let sha256 = assets
                    .model_info()
                    .map(|info| info.sha256.as_str())
                    .unwrap_or("");
                inner
                    .model_info
                    .with_label_values(&[assets.classifier().format(), sha256])
                    .set(1.0);
            }
            None => inner.assets_loaded.set(0),
        }
    }
}

/// Structured logger for advisor events
///
/// Provides consistent JSON-formatted logging for startup, asset loading
/// and predictions.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "advisor_started",
            service = %self.service,
            version = %version,
            addr = %addr,
            "Fertilizer advisor starting, open http://{} in a browser",
            addr
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "advisor_shutdown",
            service = %self.service,
            reason = %reason,
            "Fertilizer advisor shutting down"
        );
    }

    /// Status line for a successful asset load
    pub fn log_assets_loaded(&self, assets: &Assets) {
        let encoders = assets.encoders();
        info!(
            event = "assets_loaded",
            service = %self.service,
            model_format = assets.classifier().format(),
            model_path = ?assets.model_info().map(|i| i.path.display().to_string()),
            model_sha256 = ?assets.model_info().map(|i| i.sha256.as_str()),
            encoder_sha256 = ?assets.encoder_info().map(|i| i.sha256.as_str()),
            classes = ?assets.classifier().class_count(),
            soil_options = encoders.get(CategoricalField::Soil).len(),
            crop_options = encoders.get(CategoricalField::Crop).len(),
            "Model and label encoders loaded successfully"
        );
    }

    /// Status line for a failed asset load
    pub fn log_asset_load_failed(&self, err: &LoadError, paths: &AssetPaths) {
        match err {
            LoadError::ArtifactMissing { path } => error!(
                event = "asset_load_failed",
                service = %self.service,
                kind = err.kind(),
                path = %path.display(),
                model_path = %paths.model_path.display(),
                encoder_path = %paths.encoder_path.display(),
                "Model or encoder file not found, serving in degraded mode"
            ),
            LoadError::ArtifactCorrupt { path, reason } => error!(
                event = "asset_load_failed",
                service = %self.service,
                kind = err.kind(),
                path = %path.display(),
                reason = %reason,
                "Error loading assets, serving in degraded mode"
            ),
        }
    }

    pub fn log_prediction(&self, recommendation: &Recommendation, elapsed_us: u128) {
        info!(
            event = "prediction_generated",
            service = %self.service,
            label = recommendation.label,
            fertilizer = %recommendation.fertilizer,
            elapsed_us = elapsed_us,
            "Generated fertilizer recommendation"
        );
    }

    /// Rejected requests log at info; failures on valid input at error
    pub fn log_prediction_error(&self, err: &PredictError) {
        match err {
            PredictError::InvalidInput { .. } | PredictError::UnknownCategory { .. } => info!(
                event = "prediction_rejected",
                service = %self.service,
                kind = err.kind(),
                error = %err,
                "Prediction request rejected"
            ),
            PredictError::ModelUnavailable => warn!(
                event = "prediction_rejected",
                service = %self.service,
                kind = err.kind(),
                "Prediction requested while assets are not loaded"
            ),
            PredictError::Unexpected(detail) => error!(
                event = "prediction_failed",
                service = %self.service,
                kind = err.kind(),
                error = %detail,
                "Prediction error"
            ),
        }
    }
}
