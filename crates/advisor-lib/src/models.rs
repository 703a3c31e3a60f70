//! Core data models for the fertilizer advisor

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Number of inputs the classifier was fitted on
pub const FEATURE_COUNT: usize = 9;

/// Feature names in the order the classifier expects them
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Temperature",
    "Moisture",
    "PH",
    "Nitrogen",
    "Phosphorous",
    "Potassium",
    "Carbon",
    "Soil",
    "Crop",
];

/// Categorical inputs backed by a fitted label encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Soil,
    Crop,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 2] = [CategoricalField::Soil, CategoricalField::Crop];

    /// Key used in request payloads and in the encoder artifact
    pub fn name(&self) -> &'static str {
        match self {
            CategoricalField::Soil => "Soil",
            CategoricalField::Crop => "Crop",
        }
    }

    /// Human-readable name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoricalField::Soil => "Soil Type",
            CategoricalField::Crop => "Crop Type",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Untyped prediction payload as received over the wire
///
/// Every field is kept as a raw JSON value so a wrongly typed field is
/// reported by validation rather than rejected by the deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureInput {
    #[serde(rename = "Temperature", default)]
    pub temperature: Option<Value>,
    #[serde(rename = "Moisture", default)]
    pub moisture: Option<Value>,
    #[serde(rename = "PH", default)]
    pub ph: Option<Value>,
    #[serde(rename = "Nitrogen", default)]
    pub nitrogen: Option<Value>,
    #[serde(rename = "Phosphorous", default)]
    pub phosphorous: Option<Value>,
    #[serde(rename = "Potassium", default)]
    pub potassium: Option<Value>,
    #[serde(rename = "Carbon", default)]
    pub carbon: Option<Value>,
    #[serde(rename = "Soil", default)]
    pub soil: Option<Value>,
    #[serde(rename = "Crop", default)]
    pub crop: Option<Value>,
}

/// Validated measurements for a single prediction
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub temperature: f64,
    pub moisture: f64,
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorous: f64,
    pub potassium: f64,
    pub carbon: f64,
    pub soil: String,
    pub crop: String,
}

impl FeatureRecord {
    pub fn category(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Soil => &self.soil,
            CategoricalField::Crop => &self.crop,
        }
    }
}

/// Encoded feature vector for classifier input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub temperature: f64,
    pub moisture: f64,
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorous: f64,
    pub potassium: f64,
    pub carbon: f64,
    pub soil_code: f64,
    pub crop_code: f64,
}

impl FeatureVector {
    /// Values in classifier input order (see [`FEATURE_NAMES`])
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.temperature,
            self.moisture,
            self.ph,
            self.nitrogen,
            self.phosphorous,
            self.potassium,
            self.carbon,
            self.soil_code,
            self.crop_code,
        ]
    }
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Raw classifier label
    pub label: i64,
    /// Display name from the fertilizer table
    pub fertilizer: String,
}

/// Selectable labels for each categorical field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOptions {
    #[serde(rename = "Soil")]
    pub soil: Vec<String>,
    #[serde(rename = "Crop")]
    pub crop: Vec<String>,
}

impl CategoryOptions {
    pub fn get(&self, field: CategoricalField) -> &[String] {
        match field {
            CategoricalField::Soil => &self.soil,
            CategoricalField::Crop => &self.crop,
        }
    }

    /// True when no options are available (assets not loaded)
    pub fn is_empty(&self) -> bool {
        self.soil.is_empty() && self.crop.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_order_matches_names() {
        let vector = FeatureVector {
            temperature: 1.0,
            moisture: 2.0,
            ph: 3.0,
            nitrogen: 4.0,
            phosphorous: 5.0,
            potassium: 6.0,
            carbon: 7.0,
            soil_code: 8.0,
            crop_code: 9.0,
        };

        assert_eq!(
            vector.to_array(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
        assert_eq!(FEATURE_NAMES[7], CategoricalField::Soil.name());
        assert_eq!(FEATURE_NAMES[8], CategoricalField::Crop.name());
    }

    #[test]
    fn test_feature_input_accepts_mixed_types() {
        let input: FeatureInput = serde_json::from_str(
            r#"{"Temperature": "abc", "Moisture": 60, "Soil": 3, "Crop": null}"#,
        )
        .unwrap();

        assert_eq!(input.temperature, Some(Value::from("abc")));
        assert_eq!(input.moisture, Some(Value::from(60)));
        assert_eq!(input.soil, Some(Value::from(3)));
        assert!(input.crop.is_none());
        assert!(input.ph.is_none());
    }

    #[test]
    fn test_category_options_serialize_with_field_names() {
        let options = CategoryOptions {
            soil: vec!["Loamy".to_string()],
            crop: vec!["Wheat".to_string()],
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["Soil"][0], "Loamy");
        assert_eq!(json["Crop"][0], "Wheat");
    }
}
