//! Fertilizer prediction service

mod features;
mod inference;
mod output;
mod tree;

#[cfg(test)]
mod tests;

pub use features::encode;
pub use inference::OnnxClassifier;
pub use output::{FertilizerNameTable, FERTILIZER_NAMES, UNKNOWN_FERTILIZER};
pub use tree::DecisionTree;

use crate::assets::Assets;
use crate::catalog;
use crate::error::PredictError;
use crate::models::{CategoryOptions, FeatureInput, FeatureRecord, FeatureVector, Recommendation};
use anyhow::Result;
use std::sync::Arc;

/// Trait for classifier implementations
///
/// Implementations receive the encoded vector in the order given by
/// [`crate::models::FEATURE_NAMES`] and return a single class label.
pub trait Classifier: Send + Sync {
    /// Predict the class label for one feature vector
    fn classify(&self, features: &FeatureVector) -> Result<i64>;

    /// Short name of the artifact format, used in logs and metrics
    fn format(&self) -> &'static str;

    /// Number of classes the model can emit, if known
    fn class_count(&self) -> Option<usize> {
        None
    }
}

/// Prediction service over the assets loaded at startup
///
/// Holds either a complete set of assets or none at all. Cloning is cheap
/// and every clone shares the same read-only assets.
#[derive(Clone)]
pub struct FertilizerAdvisor {
    assets: Option<Arc<Assets>>,
    names: FertilizerNameTable,
}

impl FertilizerAdvisor {
    pub fn new(assets: Assets) -> Self {
        Self {
            assets: Some(Arc::new(assets)),
            names: FertilizerNameTable::new(),
        }
    }

    /// Advisor running in degraded mode
    pub fn unavailable() -> Self {
        Self {
            assets: None,
            names: FertilizerNameTable::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.assets.is_some()
    }

    pub fn assets(&self) -> Option<&Assets> {
        self.assets.as_deref()
    }

    /// Selectable labels per categorical field; empty when unavailable
    pub fn options(&self) -> CategoryOptions {
        catalog::options(self.assets().map(Assets::encoders))
    }

    /// Validate a raw payload and recommend a fertilizer
    pub fn predict(&self, input: &FeatureInput) -> Result<Recommendation, PredictError> {
        if !self.is_available() {
            return Err(PredictError::ModelUnavailable);
        }
        let record = FeatureRecord::parse(input)?;
        self.predict_record(&record)
    }

    /// Recommend a fertilizer for an already parsed record
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<Recommendation, PredictError> {
        let assets = self.assets().ok_or(PredictError::ModelUnavailable)?;

        let features = encode(record, assets.encoders())?;
        let label = assets
            .classifier()
            .classify(&features)
            .map_err(|e| PredictError::Unexpected(format!("{:#}", e)))?;

        Ok(Recommendation {
            label,
            fertilizer: self.names.name_for(label).to_string(),
        })
    }
}
