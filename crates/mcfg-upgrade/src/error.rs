//! Error types for the upgrade pass
//!
//! The rewrite rules never fail on unknown or extra keys. The only failure is
//! a section that must be a mapping (or a feature list that must be a
//! sequence) holding some other kind of node.

use serde_json::Value;
use std::fmt;

/// Kind of a configuration node, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// String-keyed mapping
    Mapping,
    /// Ordered sequence
    Sequence,
    /// String scalar
    String,
    /// Numeric scalar
    Number,
    /// Boolean scalar
    Bool,
    /// Null
    Null,
}

impl NodeKind {
    /// Classify a node
    #[inline]
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Mapping,
            Value::Array(_) => Self::Sequence,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// A section has the wrong node kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed config at `{path}`: expected {expected}, found {found}")]
pub struct MalformedConfigError {
    /// Dotted path of the offending node
    pub path: String,
    /// Kind the upgrade needed
    pub expected: NodeKind,
    /// Kind actually present
    pub found: NodeKind,
}

impl MalformedConfigError {
    /// Create error for a node at `path`
    pub fn new(path: impl Into<String>, expected: NodeKind, found: &Value) -> Self {
        Self {
            path: path.into(),
            expected,
            found: NodeKind::of(found),
        }
    }
}

/// Result type alias for upgrade operations
pub type UpgradeResult<T> = Result<T, MalformedConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_kind_of() {
        assert_eq!(NodeKind::of(&json!({})), NodeKind::Mapping);
        assert_eq!(NodeKind::of(&json!([1])), NodeKind::Sequence);
        assert_eq!(NodeKind::of(&json!("x")), NodeKind::String);
        assert_eq!(NodeKind::of(&json!(1.5)), NodeKind::Number);
        assert_eq!(NodeKind::of(&json!(true)), NodeKind::Bool);
        assert_eq!(NodeKind::of(&Value::Null), NodeKind::Null);
    }

    #[test]
    fn malformed_error_display() {
        let err = MalformedConfigError::new("hyperopt", NodeKind::Mapping, &json!([1, 2]));
        assert_eq!(
            err.to_string(),
            "malformed config at `hyperopt`: expected mapping, found sequence"
        );
    }
}
