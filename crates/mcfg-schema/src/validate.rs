//! JSON-schema generation, validation and config loading
//!
//! Loading runs four stages in order: upgrade of deprecated fields, schema
//! validation (collecting every violation), typed deserialization into
//! [`ModelConfig`], and the semantic checks of [`ModelConfig::check`].

use jsonschema::JSONSchema;
use mcfg_upgrade::{upgrade_deprecated_fields, FeatureTypeLookup, NoticeSink};
use serde_json::Value;

use crate::config::ModelConfig;
use crate::error::{SchemaError, SchemaResult, Violation};

/// JSON schema of the current config shape
///
/// # Errors
/// Returns error if the generated schema cannot be serialized
pub fn model_config_schema() -> SchemaResult<Value> {
    let schema = schemars::schema_for!(ModelConfig);
    Ok(serde_json::to_value(schema)?)
}

/// Compiled model config schema
pub struct ConfigValidator {
    schema: JSONSchema,
}

impl ConfigValidator {
    /// Compile the model config schema
    ///
    /// # Errors
    /// Returns error if the schema does not compile
    pub fn new() -> SchemaResult<Self> {
        let schema = model_config_schema()?;
        let compiled = JSONSchema::compile(&schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { schema: compiled })
    }

    /// Check if a document matches the schema
    #[must_use]
    pub fn is_valid(&self, config: &Value) -> bool {
        self.schema.is_valid(config)
    }

    /// Every violation in a document, empty when valid
    #[must_use]
    pub fn violations(&self, config: &Value) -> Vec<Violation> {
        match self.schema.validate(config) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| Violation::new(e.instance_path.to_string(), e.to_string()))
                .collect(),
        }
    }

    /// Validate a document against the schema
    ///
    /// # Errors
    /// Returns [`SchemaError::Invalid`] with every violation
    pub fn validate(&self, config: &Value) -> SchemaResult<()> {
        let violations = self.violations(config);
        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), "config failed schema validation");
            Err(SchemaError::Invalid(violations))
        }
    }

    /// Upgrade, validate, deserialize and check a document
    ///
    /// # Errors
    /// Returns the first stage's error
    pub fn load<L>(&self, mut config: Value, feature_types: &L, sink: &dyn NoticeSink) -> SchemaResult<ModelConfig>
    where
        L: FeatureTypeLookup + ?Sized,
    {
        upgrade_deprecated_fields(&mut config, feature_types, sink)?;
        self.validate(&config)?;
        let model: ModelConfig = serde_json::from_value(config)?;
        model.check()?;
        tracing::debug!(
            inputs = model.input_features.len(),
            outputs = model.output_features.len(),
            "config loaded"
        );
        Ok(model)
    }
}

/// Upgrade, validate, deserialize and check a document
///
/// # Errors
/// Returns the first stage's error
pub fn load_config<L>(config: Value, feature_types: &L, sink: &dyn NoticeSink) -> SchemaResult<ModelConfig>
where
    L: FeatureTypeLookup + ?Sized,
{
    ConfigValidator::new()?.load(config, feature_types, sink)
}
