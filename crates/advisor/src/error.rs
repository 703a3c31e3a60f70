//! HTTP error responses
//!
//! Every failure becomes a JSON object with an `error` message and a
//! machine-readable `code`.

use advisor_lib::{CategoricalField, PredictError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message shown for any malformed numeric input
pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input. Ensure all numerical fields are filled correctly.";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Model not loaded.")]
    ModelUnavailable,

    #[error("Invalid input. Ensure all numerical fields are filled correctly.")]
    InvalidInput { field: Option<String> },

    #[error("Unknown {}: '{value}'", field.display_name())]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },

    #[error("Unexpected server error during prediction: {0}")]
    Unexpected(String),

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::UnknownCategory { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ModelUnavailable => "MODEL_UNAVAILABLE",
            ApiError::InvalidInput { .. } => "INVALID_INPUT",
            ApiError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            ApiError::Unexpected(_) => "UNEXPECTED_FAILURE",
            ApiError::Render(_) => "RENDER_FAILURE",
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            ApiError::InvalidInput { field } => field.clone(),
            ApiError::UnknownCategory { field, .. } => Some(field.name().to_string()),
            _ => None,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::ModelUnavailable => ApiError::ModelUnavailable,
            PredictError::InvalidInput { field } => ApiError::InvalidInput {
                field: Some(field.to_string()),
            },
            PredictError::UnknownCategory { field, value } => {
                ApiError::UnknownCategory { field, value }
            }
            PredictError::Unexpected(detail) => ApiError::Unexpected(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected prediction payload");
        ApiError::InvalidInput { field: None }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
            field: self.field(),
        };
        (self.status(), Json(body)).into_response()
    }
}
