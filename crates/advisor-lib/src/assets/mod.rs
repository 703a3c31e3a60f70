//! Startup loading of the classifier and label encoders
//!
//! Both artifacts are read once when the process starts. Either both load
//! and validate, or the caller gets a [`LoadError`] and no assets at all.

mod encoder;

pub use encoder::{EncoderSet, LabelEncoder};

use crate::error::LoadError;
use crate::models::CategoricalField;
use crate::predictor::{Classifier, DecisionTree, OnnxClassifier};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Locations of the startup artifacts
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub model_path: PathBuf,
    pub encoder_path: PathBuf,
    /// Expected SHA-256 of the model artifact (hex)
    pub model_sha256: Option<String>,
    /// Expected SHA-256 of the encoder artifact (hex)
    pub encoder_sha256: Option<String>,
}

impl AssetPaths {
    pub fn new(model_path: impl Into<PathBuf>, encoder_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            encoder_path: encoder_path.into(),
            model_sha256: None,
            encoder_sha256: None,
        }
    }
}

/// Fingerprint of a loaded artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Loaded classifier and encoders, read-only after construction
pub struct Assets {
    classifier: Arc<dyn Classifier>,
    encoders: EncoderSet,
    model_info: Option<ArtifactInfo>,
    encoder_info: Option<ArtifactInfo>,
}

impl Assets {
    /// Assemble assets from already constructed parts
    pub fn new(classifier: Arc<dyn Classifier>, encoders: EncoderSet) -> Self {
        Self {
            classifier,
            encoders,
            model_info: None,
            encoder_info: None,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// Model artifact fingerprint, `None` for in-memory assets
    pub fn model_info(&self) -> Option<&ArtifactInfo> {
        self.model_info.as_ref()
    }

    pub fn encoder_info(&self) -> Option<&ArtifactInfo> {
        self.encoder_info.as_ref()
    }
}

impl fmt::Debug for Assets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assets")
            .field("classifier", &self.classifier.format())
            .field("encoders", &self.encoders)
            .field("model_info", &self.model_info)
            .field("encoder_info", &self.encoder_info)
            .finish()
    }
}

/// Reads and validates startup artifacts
#[derive(Debug, Clone)]
pub struct AssetStore {
    paths: AssetPaths,
}

impl AssetStore {
    pub fn new(paths: AssetPaths) -> Self {
        Self { paths }
    }

    /// Load both artifacts; no partial result is ever returned
    pub fn load(&self) -> Result<Assets, LoadError> {
        let model_path = &self.paths.model_path;
        let (model_bytes, model_info) =
            read_artifact(model_path, self.paths.model_sha256.as_deref())?;
        let classifier = load_classifier(model_path, &model_bytes)?;

        let encoder_path = &self.paths.encoder_path;
        let (encoder_bytes, encoder_info) =
            read_artifact(encoder_path, self.paths.encoder_sha256.as_deref())?;
        let encoders =
            EncoderSet::from_json(&encoder_bytes).map_err(|e| LoadError::corrupt(encoder_path, e))?;

        debug!(
            model_format = classifier.format(),
            soil_classes = encoders.get(CategoricalField::Soil).len(),
            crop_classes = encoders.get(CategoricalField::Crop).len(),
            "Artifacts parsed"
        );

        Ok(Assets {
            classifier,
            encoders,
            model_info: Some(model_info),
            encoder_info: Some(encoder_info),
        })
    }
}

/// Read an artifact and verify its digest when one is expected
fn read_artifact(
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<(Vec<u8>, ArtifactInfo), LoadError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::ArtifactMissing {
            path: path.to_path_buf(),
        },
        _ => LoadError::corrupt(path, e),
    })?;

    let sha256 = compute_checksum(&bytes);
    if let Some(expected) = expected_sha256 {
        if !expected.trim().eq_ignore_ascii_case(&sha256) {
            return Err(LoadError::corrupt(
                path,
                format!("checksum mismatch: expected {}, got {}", expected.trim(), sha256),
            ));
        }
    }

    let info = ArtifactInfo {
        path: path.to_path_buf(),
        sha256,
        size_bytes: bytes.len(),
    };
    Ok((bytes, info))
}

/// Pick the classifier implementation from the artifact extension
fn load_classifier(path: &Path, bytes: &[u8]) -> Result<Arc<dyn Classifier>, LoadError> {
    let is_onnx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("onnx"))
        .unwrap_or(false);

    if is_onnx {
        let model = OnnxClassifier::new(bytes)
            .map_err(|e| LoadError::corrupt(path, format!("{:#}", e)))?;
        Ok(Arc::new(model))
    } else {
        let tree = DecisionTree::from_json(bytes).map_err(|e| LoadError::corrupt(path, e))?;
        Ok(Arc::new(tree))
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
