//! Request validation and feature vector assembly
//!
//! Turns an untyped [`FeatureInput`] into a [`FeatureRecord`], then encodes
//! the record into the classifier's fixed-order [`FeatureVector`].

use crate::assets::EncoderSet;
use crate::error::PredictError;
use crate::models::{CategoricalField, FeatureInput, FeatureRecord, FeatureVector};
use serde_json::Value;

impl FeatureRecord {
    /// Coerce and validate a raw payload
    ///
    /// Numeric fields are checked in classifier order and the first failure
    /// is reported. Category membership is not checked here since it
    /// depends on the loaded encoders.
    pub fn parse(input: &FeatureInput) -> Result<Self, PredictError> {
        Ok(Self {
            temperature: numeric("Temperature", input.temperature.as_ref())?,
            moisture: numeric("Moisture", input.moisture.as_ref())?,
            ph: numeric("PH", input.ph.as_ref())?,
            nitrogen: numeric("Nitrogen", input.nitrogen.as_ref())?,
            phosphorous: numeric("Phosphorous", input.phosphorous.as_ref())?,
            potassium: numeric("Potassium", input.potassium.as_ref())?,
            carbon: numeric("Carbon", input.carbon.as_ref())?,
            soil: categorical(CategoricalField::Soil, input.soil.as_ref())?,
            crop: categorical(CategoricalField::Crop, input.crop.as_ref())?,
        })
    }
}

/// Accepts JSON numbers and numeric strings; rejects non-finite values
fn numeric(field: &'static str, value: Option<&Value>) -> Result<f64, PredictError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or(PredictError::InvalidInput { field })
}

fn categorical(field: CategoricalField, value: Option<&Value>) -> Result<String, PredictError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(PredictError::InvalidInput { field: field.name() }),
    }
}

/// Encode a record into classifier input order
pub fn encode(
    record: &FeatureRecord,
    encoders: &EncoderSet,
) -> Result<FeatureVector, PredictError> {
    let soil_code = encode_category(record, encoders, CategoricalField::Soil)?;
    let crop_code = encode_category(record, encoders, CategoricalField::Crop)?;

    Ok(FeatureVector {
        temperature: record.temperature,
        moisture: record.moisture,
        ph: record.ph,
        nitrogen: record.nitrogen,
        phosphorous: record.phosphorous,
        potassium: record.potassium,
        carbon: record.carbon,
        soil_code: soil_code as f64,
        crop_code: crop_code as f64,
    })
}

fn encode_category(
    record: &FeatureRecord,
    encoders: &EncoderSet,
    field: CategoricalField,
) -> Result<usize, PredictError> {
    let value = record.category(field);
    encoders
        .get(field)
        .transform(value)
        .ok_or_else(|| PredictError::UnknownCategory {
            field,
            value: value.to_string(),
        })
}
