//! Health check infrastructure for the fertilizer advisor
//!
//! Tracks whether the startup artifacts loaded and reports liveness and
//! readiness for the HTTP probes.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component has failed
    Unhealthy,
}

/// Information about a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: ComponentStatus::Healthy,
            message: None,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unhealthy,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Overall health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Unhealthy as soon as any component is
    pub fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        if components
            .values()
            .any(|health| health.status == ComponentStatus::Unhealthy)
        {
            ComponentStatus::Unhealthy
        } else {
            ComponentStatus::Healthy
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const CLASSIFIER: &str = "classifier";
    pub const ENCODERS: &str = "encoders";
}

/// Health of the startup artifacts plus the advisor's readiness flag
///
/// Components appear once the asset load outcome is recorded; until then
/// the report is empty and healthy.
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mark(&self, name: &str, health: ComponentHealth) {
        self.components
            .write()
            .await
            .insert(name.to_string(), health);
    }

    /// Record the outcome of the startup asset load
    ///
    /// Assets load all-or-nothing, so a failure marks both components
    /// unhealthy. The component whose artifact failed carries the error,
    /// the other one points at it.
    pub async fn record_asset_load(&self, result: Result<(), &LoadError>, model_path: &Path) {
        match result {
            Ok(()) => {
                self.mark(components::CLASSIFIER, ComponentHealth::healthy())
                    .await;
                self.mark(components::ENCODERS, ComponentHealth::healthy())
                    .await;
            }
            Err(err) => {
                let (failed, other) = if err.path() == model_path {
                    (components::CLASSIFIER, components::ENCODERS)
                } else {
                    (components::ENCODERS, components::CLASSIFIER)
                };
                self.mark(failed, ComponentHealth::unhealthy(err.to_string()))
                    .await;
                let note = format!("not loaded: {} failed", failed);
                self.mark(other, ComponentHealth::unhealthy(note)).await;
            }
        }
    }

    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        HealthResponse {
            status: HealthResponse::compute_status(&components),
            components,
        }
    }

    /// Ready once startup finished and both artifacts are healthy
    pub async fn readiness(&self) -> ReadinessResponse {
        let reason = if !*self.ready.read().await {
            Some("Advisor not yet initialized")
        } else if self.health().await.status == ComponentStatus::Unhealthy {
            Some("Model assets unavailable")
        } else {
            None
        };

        ReadinessResponse {
            ready: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing(path: &str) -> LoadError {
        LoadError::ArtifactMissing {
            path: PathBuf::from(path),
        }
    }

    #[tokio::test]
    async fn test_nothing_recorded_yet() {
        let registry = HealthRegistry::new();
        let health = registry.health().await;

        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());

        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert_eq!(readiness.reason.as_deref(), Some("Advisor not yet initialized"));
    }

    #[tokio::test]
    async fn test_successful_load_is_healthy_and_ready() {
        let registry = HealthRegistry::new();
        registry
            .record_asset_load(Ok(()), Path::new("model.json"))
            .await;
        registry.set_ready(true).await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Healthy);
        assert_eq!(health.components.len(), 2);

        let readiness = registry.readiness().await;
        assert!(readiness.ready);
        assert!(readiness.reason.is_none());
    }

    #[tokio::test]
    async fn test_failed_model_load_names_classifier() {
        let registry = HealthRegistry::new();
        let err = missing("model.json");
        registry
            .record_asset_load(Err(&err), Path::new("model.json"))
            .await;

        let health = registry.health().await;
        let classifier = &health.components[components::CLASSIFIER];
        assert!(classifier.message.as_deref().unwrap().contains("model.json"));
        let encoders = &health.components[components::ENCODERS];
        assert_eq!(encoders.status, ComponentStatus::Unhealthy);
        assert!(encoders.message.as_deref().unwrap().contains("classifier"));
    }

    #[tokio::test]
    async fn test_failed_encoder_load_marks_both_unhealthy() {
        let registry = HealthRegistry::new();
        let err = missing("label_encoders.json");
        registry
            .record_asset_load(Err(&err), Path::new("model.json"))
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);

        let encoders = &health.components[components::ENCODERS];
        assert!(encoders
            .message
            .as_deref()
            .unwrap()
            .contains("label_encoders.json"));
        let classifier = &health.components[components::CLASSIFIER];
        assert_eq!(classifier.status, ComponentStatus::Unhealthy);
        assert!(classifier.message.as_deref().unwrap().contains("encoders"));
    }

    #[tokio::test]
    async fn test_degraded_advisor_is_never_ready() {
        let registry = HealthRegistry::new();
        let err = missing("model.json");
        registry
            .record_asset_load(Err(&err), Path::new("model.json"))
            .await;
        registry.set_ready(true).await;

        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert_eq!(readiness.reason.as_deref(), Some("Model assets unavailable"));
    }
}
