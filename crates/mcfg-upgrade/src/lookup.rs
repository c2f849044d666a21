//! Read-only access to the set of known input-feature types
//!
//! The preprocessing-defaults rule needs to know which preprocessing keys name
//! a feature type. The set is owned by the caller (usually the schema
//! registry); the upgrade pass only asks membership questions.

use std::collections::{BTreeSet, HashSet};

/// Membership test over input-feature-type names
pub trait FeatureTypeLookup {
    /// Whether `name` is a known input-feature type
    fn is_feature_type(&self, name: &str) -> bool;
}

impl FeatureTypeLookup for HashSet<String> {
    #[inline]
    fn is_feature_type(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FeatureTypeLookup for HashSet<&str> {
    #[inline]
    fn is_feature_type(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FeatureTypeLookup for BTreeSet<String> {
    #[inline]
    fn is_feature_type(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FeatureTypeLookup for [&str] {
    #[inline]
    fn is_feature_type(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

impl<T: FeatureTypeLookup + ?Sized> FeatureTypeLookup for &T {
    #[inline]
    fn is_feature_type(&self, name: &str) -> bool {
        (**self).is_feature_type(name)
    }
}
