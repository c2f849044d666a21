//! Configuration document
//!
//! An owned configuration tree with JSON and YAML front ends. Mappings keep
//! insertion order, so a document written back out keeps the user's layout
//! apart from the keys the upgrade touched.

use serde_json::{Map, Value};

use crate::error::{MalformedConfigError, NodeKind, UpgradeResult};
use crate::lookup::FeatureTypeLookup;
use crate::notice::NoticeSink;
use crate::upgrade::Upgrader;

/// Owned configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Wrap an existing tree
    #[inline]
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let root: Value = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        let root: Value = serde_yaml::from_str(yaml)?;
        Ok(Self::new(root))
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Unwrap into the root node
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.root
    }

    /// Get a value by JSON pointer
    ///
    /// # Examples
    /// ```
    /// # use mcfg_upgrade::ConfigDocument;
    /// # use serde_json::json;
    /// let doc = ConfigDocument::new(json!({"trainer": {"epochs": 2}}));
    /// assert_eq!(doc.get("/trainer/epochs"), Some(&json!(2)));
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer)
    }

    /// Upgrade the document in place
    ///
    /// # Errors
    /// Returns error if a section has the wrong node kind
    pub fn upgrade<L>(&mut self, feature_types: &L, sink: &dyn NoticeSink) -> UpgradeResult<&mut Self>
    where
        L: FeatureTypeLookup + ?Sized,
    {
        Upgrader::new(feature_types, sink).upgrade(&mut self.root)?;
        Ok(self)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml::to_string(&self.root)?)
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl From<Value> for ConfigDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

impl From<ConfigDocument> for Value {
    fn from(doc: ConfigDocument) -> Self {
        doc.root
    }
}

/// Document parse/serialize errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Invalid JSON text
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid YAML text
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// View `value` as a mapping, or report it as malformed at `path`
pub(crate) fn expect_map_mut<'a>(
    value: &'a mut Value,
    path: &str,
) -> UpgradeResult<&'a mut Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(MalformedConfigError::new(path, NodeKind::Mapping, other)),
    }
}

/// Mutable mapping under `key`, if the key is present
pub(crate) fn section_mut<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    path: &str,
) -> UpgradeResult<Option<&'a mut Map<String, Value>>> {
    match parent.get_mut(key) {
        None => Ok(None),
        Some(value) => expect_map_mut(value, path).map(Some),
    }
}

/// JSON truthiness: empty containers, zero, `false` and null are falsy
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
