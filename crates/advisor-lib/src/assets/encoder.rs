//! Fitted label encoders for categorical inputs

use crate::models::{CategoricalField, CategoryOptions};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Bidirectional mapping between category labels and dense codes
///
/// Codes are positions in the fitted class list, so `classes()[code]`
/// always returns the label that encodes to `code`.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Build an encoder from its fitted class list
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), code).is_some() {
                return Err(format!("duplicate class label '{}'", label));
            }
        }

        Ok(Self { classes, index })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Encode a label, `None` if it was not seen during fitting
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Decode a code back to its label
    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}

/// On-disk shape of one encoder: `{"classes": [...]}` or a bare label list
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEncoder {
    Fitted { classes: Vec<String> },
    Labels(Vec<String>),
}

impl RawEncoder {
    fn into_classes(self) -> Vec<String> {
        match self {
            RawEncoder::Fitted { classes } => classes,
            RawEncoder::Labels(classes) => classes,
        }
    }
}

/// Encoders for every categorical field the classifier consumes
#[derive(Debug, Clone)]
pub struct EncoderSet {
    soil: LabelEncoder,
    crop: LabelEncoder,
}

impl EncoderSet {
    pub fn new(soil: LabelEncoder, crop: LabelEncoder) -> Self {
        Self { soil, crop }
    }

    /// Parse an encoder artifact keyed by field name
    ///
    /// Keys other than `Soil` and `Crop` are ignored.
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let mut raw: BTreeMap<String, RawEncoder> =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid encoder JSON: {}", e))?;

        let mut take = |field: CategoricalField| -> Result<LabelEncoder, String> {
            let encoder = raw
                .remove(field.name())
                .ok_or_else(|| format!("missing encoder for field '{}'", field))?;
            LabelEncoder::new(encoder.into_classes())
                .map_err(|e| format!("encoder for field '{}': {}", field, e))
        };

        let soil = take(CategoricalField::Soil)?;
        let crop = take(CategoricalField::Crop)?;
        Ok(Self { soil, crop })
    }

    pub fn get(&self, field: CategoricalField) -> &LabelEncoder {
        match field {
            CategoricalField::Soil => &self.soil,
            CategoricalField::Crop => &self.crop,
        }
    }

    /// Class lists per field, in encoder order
    pub fn options(&self) -> CategoryOptions {
        CategoryOptions {
            soil: self.soil.classes().to_vec(),
            crop: self.crop.classes().to_vec(),
        }
    }
}
