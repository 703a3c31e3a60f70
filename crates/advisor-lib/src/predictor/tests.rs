//! Tests for the prediction service
//!
//! A mock classifier stands in for a fitted model so these tests cover
//! validation, encoding and name lookup without artifacts on disk.

use super::*;
use crate::assets::{EncoderSet, LabelEncoder};
use crate::models::{CategoricalField, FEATURE_COUNT};
use serde_json::{json, Value};
use std::sync::Mutex;

/// Classifier returning a fixed label and recording its inputs
struct MockClassifier {
    label: i64,
    seen: Mutex<Vec<[f64; FEATURE_COUNT]>>,
}

impl MockClassifier {
    fn new(label: i64) -> Arc<Self> {
        Arc::new(Self {
            label,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.seen.lock().unwrap().clone()
    }
}

impl Classifier for MockClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<i64> {
        self.seen.lock().unwrap().push(features.to_array());
        Ok(self.label)
    }

    fn format(&self) -> &'static str {
        "mock"
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn classify(&self, _features: &FeatureVector) -> Result<i64> {
        anyhow::bail!("Model output has 0 values")
    }

    fn format(&self) -> &'static str {
        "failing"
    }
}

fn encoders() -> EncoderSet {
    let soil = ["Black", "Clayey", "Loamy", "Red", "Sandy"];
    let crop = ["Barley", "Cotton", "Maize", "Paddy", "Wheat"];
    EncoderSet::new(
        LabelEncoder::new(soil.iter().map(|s| s.to_string()).collect()).unwrap(),
        LabelEncoder::new(crop.iter().map(|s| s.to_string()).collect()).unwrap(),
    )
}

fn advisor_with(classifier: Arc<dyn Classifier>) -> FertilizerAdvisor {
    FertilizerAdvisor::new(Assets::new(classifier, encoders()))
}

fn payload(overrides: Value) -> FeatureInput {
    let mut base = json!({
        "Temperature": 25, "Moisture": 60, "PH": 6.5,
        "Nitrogen": 20, "Phosphorous": 15, "Potassium": 10, "Carbon": 1.2,
        "Soil": "Loamy", "Crop": "Wheat"
    });
    if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).unwrap()
}

#[test]
fn test_valid_request_returns_table_name() {
    for label in 0..10 {
        let advisor = advisor_with(MockClassifier::new(label));
        let recommendation = advisor.predict(&payload(json!({}))).unwrap();

        assert_eq!(recommendation.label, label);
        assert!(FERTILIZER_NAMES.contains(&recommendation.fertilizer.as_str()));
    }
}

#[test]
fn test_classifier_receives_fixed_order_vector() {
    let classifier = MockClassifier::new(2);
    let advisor = advisor_with(classifier.clone());

    let recommendation = advisor.predict(&payload(json!({}))).unwrap();
    assert_eq!(recommendation.fertilizer, "DAP");

    // Loamy is code 2, Wheat is code 4
    assert_eq!(
        classifier.calls(),
        vec![[25.0, 60.0, 6.5, 20.0, 15.0, 10.0, 1.2, 2.0, 4.0]]
    );
}

#[test]
fn test_unmapped_label_falls_back() {
    let advisor = advisor_with(MockClassifier::new(11));
    let recommendation = advisor.predict(&payload(json!({}))).unwrap();

    assert_eq!(recommendation.label, 11);
    assert_eq!(recommendation.fertilizer, UNKNOWN_FERTILIZER);
}

#[test]
fn test_unknown_soil_and_crop_are_symmetric() {
    let advisor = advisor_with(MockClassifier::new(0));

    for field in CategoricalField::ALL {
        let input = payload(json!({ field.name(): "Martian" }));
        match advisor.predict(&input).unwrap_err() {
            PredictError::UnknownCategory { field: got, value } => {
                assert_eq!(got, field);
                assert_eq!(value, "Martian");
            }
            other => panic!("unexpected error for {}: {:?}", field, other),
        }
    }
}

#[test]
fn test_invalid_numeric_input() {
    let classifier = MockClassifier::new(0);
    let advisor = advisor_with(classifier.clone());

    let err = advisor
        .predict(&payload(json!({ "Temperature": "abc" })))
        .unwrap_err();
    assert!(matches!(err, PredictError::InvalidInput { field: "Temperature" }));

    let err = advisor
        .predict(&payload(json!({ "Carbon": null })))
        .unwrap_err();
    assert!(matches!(err, PredictError::InvalidInput { field: "Carbon" }));

    assert!(classifier.calls().is_empty());
}

#[test]
fn test_numeric_errors_take_precedence_over_categories() {
    let advisor = advisor_with(MockClassifier::new(0));
    let err = advisor
        .predict(&payload(json!({ "PH": "acidic", "Soil": "Martian" })))
        .unwrap_err();
    assert!(matches!(err, PredictError::InvalidInput { field: "PH" }));
}

#[test]
fn test_unavailable_advisor() {
    let advisor = FertilizerAdvisor::unavailable();

    assert!(!advisor.is_available());
    assert!(advisor.options().is_empty());
    assert!(matches!(
        advisor.predict(&payload(json!({}))).unwrap_err(),
        PredictError::ModelUnavailable
    ));
    // Availability is checked before the payload is looked at
    assert!(matches!(
        advisor.predict(&FeatureInput::default()).unwrap_err(),
        PredictError::ModelUnavailable
    ));
}

#[test]
fn test_classifier_failure_is_unexpected() {
    let advisor = advisor_with(Arc::new(FailingClassifier));
    match advisor.predict(&payload(json!({}))).unwrap_err() {
        PredictError::Unexpected(message) => assert!(message.contains("0 values")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_options_follow_encoders() {
    let advisor = advisor_with(MockClassifier::new(0));
    let options = advisor.options();

    assert_eq!(options.soil, vec!["Black", "Clayey", "Loamy", "Red", "Sandy"]);
    assert_eq!(options.crop, vec!["Barley", "Cotton", "Maize", "Paddy", "Wheat"]);
}

#[test]
fn test_predict_record_skips_parsing() {
    let advisor = advisor_with(MockClassifier::new(8));
    let record = FeatureRecord {
        temperature: 30.0,
        moisture: 40.0,
        ph: 7.1,
        nitrogen: 12.0,
        phosphorous: 8.0,
        potassium: 5.0,
        carbon: 0.9,
        soil: "Black".to_string(),
        crop: "Cotton".to_string(),
    };

    let recommendation = advisor.predict_record(&record).unwrap();
    assert_eq!(recommendation.fertilizer, "Urea");
}
