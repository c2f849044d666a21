//! Typed model configuration records
//!
//! These describe the current (post-upgrade) document shape. Legacy shapes
//! such as `training`, `hyperopt.sampler` or the flat split keys are rejected
//! here; run the upgrade pass first.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decoder::decoders_for;
use crate::encoder::{encoders_for, EncoderConfig};
use crate::error::{SchemaError, SchemaResult};
use crate::feature_type::FeatureType;

/// Complete model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Features fed to the model
    #[schemars(length(min = 1))]
    pub input_features: Vec<InputFeatureConfig>,
    /// Features the model predicts
    #[schemars(length(min = 1))]
    pub output_features: Vec<OutputFeatureConfig>,
    /// Combiner parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combiner: Option<Map<String, Value>>,
    /// Training loop parameters
    #[serde(default)]
    pub trainer: TrainerConfig,
    /// Global preprocessing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<PreprocessingConfig>,
    /// Per-feature-type defaults
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<FeatureType, FeatureDefaultsConfig>,
    /// Hyperparameter search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperopt: Option<HyperoptConfig>,
    /// Execution backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<Map<String, Value>>,
}

impl ModelConfig {
    /// Look up an input feature by name
    #[must_use]
    pub fn input_feature(&self, name: &str) -> Option<&InputFeatureConfig> {
        self.input_features.iter().find(|f| f.name == name)
    }

    /// Checks the schema cannot express
    ///
    /// # Errors
    /// Returns the first unsupported encoder/decoder/output type, bad tie or
    /// inconsistent split found
    pub fn check(&self) -> SchemaResult<()> {
        for feature in &self.input_features {
            if let Some(encoder) = &feature.encoder {
                if !encoders_for(feature.feature_type).contains(&encoder.name()) {
                    return Err(SchemaError::UnsupportedEncoder {
                        feature: feature.name.clone(),
                        feature_type: feature.feature_type,
                        encoder: encoder.name().to_string(),
                    });
                }
            }
            if let Some(tied) = &feature.tied {
                self.check_tie(feature, tied)?;
            }
        }

        for feature in &self.output_features {
            if !feature.feature_type.is_output_capable() {
                return Err(SchemaError::UnsupportedOutputType {
                    feature: feature.name.clone(),
                    feature_type: feature.feature_type,
                });
            }
            if let Some(decoder) = &feature.decoder {
                if !decoders_for(feature.feature_type).contains(&decoder.name()) {
                    return Err(SchemaError::UnsupportedDecoder {
                        feature: feature.name.clone(),
                        feature_type: feature.feature_type,
                        decoder: decoder.name().to_string(),
                    });
                }
            }
        }

        if let Some(split) = self.preprocessing.as_ref().and_then(|p| p.split.as_ref()) {
            split.check()?;
        }
        Ok(())
    }

    fn check_tie(&self, feature: &InputFeatureConfig, tied: &str) -> SchemaResult<()> {
        if tied == feature.name {
            return Err(SchemaError::bad_tie(&feature.name, tied, "a feature cannot be tied to itself"));
        }
        let Some(target) = self.input_feature(tied) else {
            return Err(SchemaError::bad_tie(&feature.name, tied, "no such input feature"));
        };
        if target.feature_type != feature.feature_type {
            return Err(SchemaError::bad_tie(
                &feature.name,
                tied,
                format!("type {} differs from {}", target.feature_type, feature.feature_type),
            ));
        }
        Ok(())
    }
}

/// Input feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InputFeatureConfig {
    /// Feature name
    pub name: String,
    /// Data type
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    /// Source column, defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Processed column name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_column: Option<String>,
    /// Type-specific preprocessing overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Map<String, Value>>,
    /// Encoder, the type's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<EncoderConfig>,
    /// Name of an input feature whose encoder weights are shared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tied: Option<String>,
    /// Feature-level parameters (`use_bias`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InputFeatureConfig {
    /// Configured encoder, or the type's default
    #[must_use]
    pub fn encoder_or_default(&self) -> EncoderConfig {
        self.encoder
            .clone()
            .unwrap_or_else(|| EncoderConfig::default_for(self.feature_type))
    }

    /// Source column
    #[must_use]
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

/// Output feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputFeatureConfig {
    /// Feature name
    pub name: String,
    /// Data type
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    /// Target column, defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Type-specific preprocessing overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Map<String, Value>>,
    /// Decoder, the type's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<DecoderConfig>,
    /// Feature-level parameters (`loss`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoder given by name or as a parameter record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DecoderConfig {
    /// Decoder name only
    Named(String),
    /// Decoder with parameters
    Params(DecoderParams),
}

impl DecoderConfig {
    /// Decoder name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Params(params) => &params.decoder_type,
        }
    }
}

/// Decoder parameter record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecoderParams {
    /// Decoder name
    #[serde(rename = "type")]
    pub decoder_type: String,
    /// Decoder parameters
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// Training loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of passes over the training set
    #[schemars(range(min = 1))]
    pub epochs: u32,
    /// Training batch size
    #[schemars(range(min = 1))]
    pub batch_size: u32,
    /// Evaluation batch size; `null` uses `batch_size`
    #[schemars(range(min = 1))]
    pub eval_batch_size: Option<u32>,
    /// Optimizer learning rate
    #[schemars(range(min = 0.0))]
    pub learning_rate: f64,
    /// Other trainer parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 128,
            eval_batch_size: None,
            learning_rate: 0.001,
            extra: Map::new(),
        }
    }
}

impl TrainerConfig {
    /// Batch size used during evaluation
    #[must_use]
    pub fn effective_eval_batch_size(&self) -> u32 {
        self.eval_batch_size.unwrap_or(self.batch_size)
    }
}

/// Global preprocessing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PreprocessingConfig {
    /// Train/validation/test split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitConfig>,
    /// Fraction of rows to sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub sample_ratio: Option<f64>,
    /// Other preprocessing parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Split strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    /// Rows assigned at random by `probabilities`
    Random,
    /// Split read from `column`
    Fixed,
    /// Random split stratified on `column`
    Stratify,
}

/// Train/validation/test split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SplitConfig {
    /// Split strategy
    #[serde(rename = "type", default = "SplitConfig::default_type")]
    pub split_type: SplitType,
    /// Column holding the split (fixed) or the stratification key (stratify)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Train, validation and test fractions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(equal = 3))]
    pub probabilities: Option<Vec<f64>>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            split_type: SplitType::Random,
            column: None,
            probabilities: Some(vec![0.7, 0.1, 0.2]),
        }
    }
}

impl SplitConfig {
    const fn default_type() -> SplitType {
        SplitType::Random
    }

    fn check(&self) -> SchemaResult<()> {
        if self.split_type == SplitType::Stratify && self.column.is_none() {
            return Err(SchemaError::InvalidSplit("stratify split requires a column".to_string()));
        }
        if let Some(probabilities) = &self.probabilities {
            let total: f64 = probabilities.iter().sum();
            if (total - 1.0).abs() > 1e-6 {
                return Err(SchemaError::InvalidSplit(format!(
                    "probabilities must sum to 1, got {total}"
                )));
            }
        }
        Ok(())
    }
}

/// Defaults applied to every feature of one type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureDefaultsConfig {
    /// Preprocessing defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Map<String, Value>>,
    /// Encoder defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<Map<String, Value>>,
    /// Decoder defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<Map<String, Value>>,
    /// Loss defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<Map<String, Value>>,
}

/// Hyperparameter search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HyperoptConfig {
    /// Search space keyed by dotted parameter path
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Trial executor
    pub executor: ExecutorConfig,
    /// Search algorithm
    pub search_alg: SearchAlgConfig,
    /// Whether `metric` is minimized or maximized
    #[serde(default)]
    pub goal: Goal,
    /// Metric to optimize
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Output feature the metric is read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_feature: Option<String>,
    /// Split the metric is read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
}

/// Optimization direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Lower is better
    #[default]
    Minimize,
    /// Higher is better
    Maximize,
}

/// Only the distributed executor remains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorType {
    /// Ray Tune
    #[default]
    Ray,
}

/// Trial executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutorConfig {
    /// Executor kind
    #[serde(rename = "type")]
    pub executor_type: ExecutorType,
    /// Number of trials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub num_samples: Option<u32>,
    /// Trial scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<Map<String, Value>>,
    /// Wall-clock budget in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_s: Option<f64>,
    /// Trials run at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_trials: Option<u32>,
    /// Other executor parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search algorithm, parameters passed through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchAlgConfig {
    /// Algorithm name
    #[serde(rename = "type")]
    pub alg_type: String,
    /// Algorithm parameters
    #[serde(flatten)]
    pub params: Map<String, Value>,
}
