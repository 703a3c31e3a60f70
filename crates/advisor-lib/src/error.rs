//! Error types for asset loading and prediction

use crate::models::CategoricalField;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a model or encoder artifact at startup
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("artifact not found: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("failed to load artifact {}: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LoadError::ArtifactCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the artifact that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::ArtifactMissing { path } | LoadError::ArtifactCorrupt { path, .. } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::ArtifactMissing { .. } => "artifact_missing",
            LoadError::ArtifactCorrupt { .. } => "artifact_corrupt",
        }
    }
}

/// Failure to produce a recommendation for a request
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model not loaded")]
    ModelUnavailable,

    #[error("invalid value for field {field}")]
    InvalidInput { field: &'static str },

    #[error("unknown {}: '{value}'", field.display_name())]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },

    #[error("prediction failed: {0}")]
    Unexpected(String),
}

impl PredictError {
    /// Stable label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::ModelUnavailable => "model_unavailable",
            PredictError::InvalidInput { .. } => "invalid_input",
            PredictError::UnknownCategory { .. } => "unknown_category",
            PredictError::Unexpected(_) => "unexpected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_names_field_and_value() {
        let err = PredictError::UnknownCategory {
            field: CategoricalField::Soil,
            value: "Martian".to_string(),
        };
        assert_eq!(err.to_string(), "unknown Soil Type: 'Martian'");
        assert_eq!(err.kind(), "unknown_category");
    }

    #[test]
    fn test_load_error_reports_path() {
        let err = LoadError::corrupt("model.json", "unexpected end of input");
        assert_eq!(err.path(), std::path::Path::new("model.json"));
        assert!(err.to_string().contains("unexpected end of input"));
    }
}
