//! Decoder names per output feature type

use crate::feature_type::FeatureType;

/// Decoder names accepted by an output feature type (empty for input-only types)
#[must_use]
pub const fn decoders_for(feature_type: FeatureType) -> &'static [&'static str] {
    match feature_type {
        FeatureType::Category | FeatureType::Set => &["classifier"],
        FeatureType::Binary | FeatureType::Number => &["regressor"],
        FeatureType::Sequence | FeatureType::Text => &["generator", "tagger"],
        FeatureType::Vector => &["projector"],
        _ => &[],
    }
}

/// Decoder used when an output feature has none
#[must_use]
pub fn default_decoder(feature_type: FeatureType) -> Option<&'static str> {
    decoders_for(feature_type).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoders_only_for_output_types() {
        for feature_type in FeatureType::ALL {
            assert_eq!(
                decoders_for(feature_type).is_empty(),
                !feature_type.is_output_capable(),
                "{feature_type}"
            );
        }
    }

    #[test]
    fn default_decoders() {
        assert_eq!(default_decoder(FeatureType::Category), Some("classifier"));
        assert_eq!(default_decoder(FeatureType::Text), Some("generator"));
        assert_eq!(default_decoder(FeatureType::Image), None);
    }
}
