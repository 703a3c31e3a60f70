//! ONNX classifier inference using tract
//!
//! Loads classifiers exported to ONNX and evaluates them with tract-onnx.
//! The graph takes one `[1, 9]` f32 input and its first output holds the
//! predicted class label.

use super::Classifier;
use crate::models::{FeatureVector, FEATURE_COUNT};
use anyhow::{Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based classifier
pub struct OnnxClassifier {
    model: TractModel,
}

impl OnnxClassifier {
    /// Create a classifier from model bytes
    pub fn new(model_bytes: &[u8]) -> Result<Self> {
        let model = Self::load_model(model_bytes)?;
        Ok(Self { model })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    /// Convert feature vector to a `[1, 9]` f32 tensor
    fn features_to_tensor(features: &FeatureVector) -> Result<Tensor> {
        let data: Vec<f32> = features.to_array().iter().map(|&v| v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, FEATURE_COUNT), data)
            .context("Failed to shape feature tensor")?;
        Ok(array.into())
    }

    /// Read the predicted label from the model's first output
    fn tensor_to_label(output: &Tensor) -> Result<i64> {
        let labels = output
            .cast_to::<i64>()
            .context("Model output is not a label tensor")?;
        let view = labels.to_array_view::<i64>()?;
        view.iter()
            .next()
            .copied()
            .context("Model output has no labels")
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<i64> {
        let start = Instant::now();

        let input = Self::features_to_tensor(features)?;
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target", MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Self::tensor_to_label(output)
    }

    fn format(&self) -> &'static str {
        "onnx"
    }
}
