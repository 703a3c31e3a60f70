//! Category catalog for form options and request validation

use crate::assets::EncoderSet;
use crate::models::CategoryOptions;

/// Valid labels per categorical field, in encoder order
///
/// Returns empty lists when no encoders are loaded; callers treat that as
/// degraded mode rather than an error.
pub fn options(encoders: Option<&EncoderSet>) -> CategoryOptions {
    encoders.map(EncoderSet::options).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LabelEncoder;
    use crate::models::CategoricalField;

    #[test]
    fn test_options_equal_encoder_classes() {
        let soil = vec!["Sandy".to_string(), "Black".to_string(), "Red".to_string()];
        let crop = vec!["Wheat".to_string(), "Maize".to_string()];
        let encoders = EncoderSet::new(
            LabelEncoder::new(soil.clone()).unwrap(),
            LabelEncoder::new(crop.clone()).unwrap(),
        );

        let options = options(Some(&encoders));
        assert_eq!(options.get(CategoricalField::Soil), soil.as_slice());
        assert_eq!(options.get(CategoricalField::Crop), crop.as_slice());
    }

    #[test]
    fn test_options_empty_without_encoders() {
        let options = options(None);
        assert!(options.is_empty());
        assert!(options.soil.is_empty());
        assert!(options.crop.is_empty());
    }
}
