//! Fertilizer advisor library
//!
//! This crate provides the core functionality for:
//! - Loading the fitted classifier and label encoders
//! - Category options for the recommendation form
//! - Request validation and fertilizer prediction
//! - Health checks and observability

pub mod assets;
pub mod catalog;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use assets::{AssetPaths, AssetStore, Assets, EncoderSet, LabelEncoder};
pub use error::{LoadError, PredictError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{AdvisorMetrics, StructuredLogger};
pub use predictor::{Classifier, FertilizerAdvisor, FertilizerNameTable, UNKNOWN_FERTILIZER};
