//! HTTP API: pages, prediction, health checks and Prometheus metrics

use crate::error::ApiError;
use crate::pages::{Pages, ASSETS_UNAVAILABLE_MESSAGE};
use advisor_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{AdvisorMetrics, StructuredLogger},
    FeatureInput, FertilizerAdvisor, PredictError,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub advisor: FertilizerAdvisor,
    pub pages: Pages,
    pub health_registry: HealthRegistry,
    pub metrics: AdvisorMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        advisor: FertilizerAdvisor,
        pages: Pages,
        health_registry: HealthRegistry,
        metrics: AdvisorMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            advisor,
            pages,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Successful prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub fertilizer_recommendation: String,
}

/// Landing page
async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let html = state
        .pages
        .home()
        .map_err(|e| ApiError::Render(e.to_string()))?;
    Ok(Html(html))
}

/// Recommendation form - 500 with an error page in degraded mode
async fn recommend_form(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    if !state.advisor.is_available() {
        let html = state
            .pages
            .error(ASSETS_UNAVAILABLE_MESSAGE)
            .map_err(|e| ApiError::Render(e.to_string()))?;
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response());
    }

    let html = state
        .pages
        .recommend(&state.advisor.options())
        .map_err(|e| ApiError::Render(e.to_string()))?;
    Ok(Html(html).into_response())
}

/// Run a prediction for a JSON payload
async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeatureInput>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    if !state.advisor.is_available() {
        return Err(record_failure(&state, PredictError::ModelUnavailable));
    }

    let Json(input) = payload.map_err(|rejection| {
        state.metrics.inc_prediction_errors("invalid_input");
        ApiError::from(rejection)
    })?;

    let start = Instant::now();
    let result = state.advisor.predict(&input);
    let elapsed = start.elapsed();
    state
        .metrics
        .observe_prediction_latency(elapsed.as_secs_f64());

    match result {
        Ok(recommendation) => {
            state.metrics.inc_predictions(&recommendation.fertilizer);
            state
                .logger
                .log_prediction(&recommendation, elapsed.as_micros());
            Ok(Json(PredictResponse {
                success: true,
                fertilizer_recommendation: recommendation.fertilizer,
            }))
        }
        Err(err) => Err(record_failure(&state, err)),
    }
}

fn record_failure(state: &AppState, err: PredictError) -> ApiError {
    state.metrics.inc_prediction_errors(err.kind());
    state.logger.log_prediction_error(&err);
    err.into()
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/recommend", get(recommend_form))
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server, stopping when `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
