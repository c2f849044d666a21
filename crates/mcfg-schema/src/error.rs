//! Error types for config loading and validation

use std::fmt;

use mcfg_upgrade::MalformedConfigError;

use crate::feature_type::FeatureType;

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending node (empty for the root)
    pub path: String,
    /// Validator message
    pub message: String,
}

impl Violation {
    /// Create violation at pointer
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.message)
    }
}

/// Errors while loading a model config
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Upgrade pass hit a section of the wrong kind
    #[error(transparent)]
    Malformed(#[from] MalformedConfigError),

    /// Generated schema did not compile
    #[error("invalid schema: {0}")]
    Compile(String),

    /// Document does not match the schema
    #[error("config does not match schema ({} violation(s))", .0.len())]
    Invalid(Vec<Violation>),

    /// Schema serialization or typed deserialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoder not available for the feature type
    #[error("feature '{feature}' of type {feature_type} does not support encoder '{encoder}'")]
    UnsupportedEncoder {
        /// Input feature name
        feature: String,
        /// Its type
        feature_type: FeatureType,
        /// Rejected encoder tag
        encoder: String,
    },

    /// Decoder not available for the output type
    #[error("output feature '{feature}' of type {feature_type} does not support decoder '{decoder}'")]
    UnsupportedDecoder {
        /// Output feature name
        feature: String,
        /// Its type
        feature_type: FeatureType,
        /// Rejected decoder name
        decoder: String,
    },

    /// Type cannot be used as an output feature
    #[error("output feature '{feature}' has type {feature_type}, which cannot be predicted")]
    UnsupportedOutputType {
        /// Output feature name
        feature: String,
        /// Its type
        feature_type: FeatureType,
    },

    /// `tied` does not name a compatible input feature
    #[error("feature '{feature}' cannot be tied to '{tied}': {reason}")]
    BadTie {
        /// Feature declaring the tie
        feature: String,
        /// Name it is tied to
        tied: String,
        /// Why the tie is rejected
        reason: String,
    },

    /// Split section is inconsistent
    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

impl SchemaError {
    /// Create tie error
    pub fn bad_tie(feature: impl Into<String>, tied: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadTie {
            feature: feature.into(),
            tied: tied.into(),
            reason: reason.into(),
        }
    }

    /// Violations of a schema failure, empty for other errors
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Invalid(violations) => violations,
            _ => &[],
        }
    }
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mcfg_upgrade::NodeKind;

    #[test]
    fn violation_display() {
        let violation = Violation::new("/trainer/epochs", "0 is less than the minimum of 1");
        assert_eq!(violation.to_string(), "/trainer/epochs: 0 is less than the minimum of 1");
        assert_eq!(Violation::new("", "x").to_string(), "/: x");
    }

    #[test]
    fn invalid_counts_violations() {
        let err = SchemaError::Invalid(vec![Violation::new("/a", "x"), Violation::new("/b", "y")]);
        assert_eq!(err.to_string(), "config does not match schema (2 violation(s))");
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn malformed_is_transparent() {
        let inner = MalformedConfigError::new("hyperopt", NodeKind::Mapping, &serde_json::json!(3));
        let message = inner.to_string();
        let err = SchemaError::from(inner);
        assert_eq!(err.to_string(), message);
        assert!(err.violations().is_empty());
    }

    #[test]
    fn bad_tie_display() {
        let err = SchemaError::bad_tie("a", "b", "no such input feature");
        assert_eq!(err.to_string(), "feature 'a' cannot be tied to 'b': no such input feature");
    }
}
