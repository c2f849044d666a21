//! Feature types and their registry
//!
//! Provides [`FeatureType`] and [`FeatureTypeRegistry`], the set of input
//! feature type names the upgrade pass consults.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use mcfg_upgrade::FeatureTypeLookup;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data type of an input or output column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// Two-valued column
    Binary,
    /// Numeric column
    Number,
    /// One label out of a vocabulary
    Category,
    /// Several labels out of a vocabulary
    Set,
    /// Weighted set of labels
    Bag,
    /// Token sequence
    Sequence,
    /// Free text
    Text,
    /// Numeric sequence
    Timeseries,
    /// Image file path
    Image,
    /// Audio file path
    Audio,
    /// Date or timestamp
    Date,
    /// H3 geospatial index
    H3,
    /// Fixed-size numeric vector
    Vector,
}

impl FeatureType {
    /// Every feature type
    pub const ALL: [Self; 13] = [
        Self::Binary,
        Self::Number,
        Self::Category,
        Self::Set,
        Self::Bag,
        Self::Sequence,
        Self::Text,
        Self::Timeseries,
        Self::Image,
        Self::Audio,
        Self::Date,
        Self::H3,
        Self::Vector,
    ];

    /// Name as written in configs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Number => "number",
            Self::Category => "category",
            Self::Set => "set",
            Self::Bag => "bag",
            Self::Sequence => "sequence",
            Self::Text => "text",
            Self::Timeseries => "timeseries",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Date => "date",
            Self::H3 => "h3",
            Self::Vector => "vector",
        }
    }

    /// Whether the type can be predicted (used as an output feature)
    #[inline]
    #[must_use]
    pub const fn is_output_capable(self) -> bool {
        matches!(
            self,
            Self::Binary | Self::Number | Self::Category | Self::Set | Self::Sequence | Self::Text | Self::Vector
        )
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown feature type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature type: '{0}'")]
pub struct UnknownFeatureType(pub String);

impl FromStr for FeatureType {
    type Err = UnknownFeatureType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFeatureType(s.to_string()))
    }
}

/// Registry of input feature type names
#[derive(Debug, Default, Clone)]
pub struct FeatureTypeRegistry {
    types: HashSet<String>,
}

impl FeatureTypeRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: HashSet::new(),
        }
    }

    /// Create registry with every built-in feature type
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for feature_type in FeatureType::ALL {
            registry.register(feature_type.as_str());
        }
        registry
    }

    /// Register a feature type name
    pub fn register(&mut self, name: &str) {
        self.types.insert(name.to_string());
    }

    /// Check if feature type exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Remove feature type
    #[inline]
    pub fn remove(&mut self, name: &str) -> bool {
        self.types.remove(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get number of registered types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FeatureTypeLookup for FeatureTypeRegistry {
    #[inline]
    fn is_feature_type(&self, name: &str) -> bool {
        self.contains(name)
    }
}
