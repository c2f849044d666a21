//! Testing utilities for the model config workspace
//!
//! Shared feature builders, fixture documents and environment flags.

#![allow(missing_docs)]

use rand::seq::IndexedRandom;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

/// Sequence encoders exercised by end-to-end tests
pub const ENCODERS: [&str; 3] = ["embed", "parallel_cnn", "stacked_cnn"];

/// Datetime formats picked from by [`date_feature`]
pub const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y-%m-%d %H:%M:%S", "%m-%d-%Y"];

/// Random uppercase hex string of `len` characters (at most 32)
#[must_use]
pub fn random_string(len: usize) -> String {
    uuid::Uuid::new_v4().simple().to_string()[..len.min(32)].to_uppercase()
}

/// Deterministic processed-column name for a feature record
#[must_use]
pub fn compute_feature_hash(feature: &Map<String, Value>) -> String {
    let name = feature.get("name").and_then(Value::as_str).unwrap_or_default();
    let digest = Sha256::digest(canonical_json(&Value::Object(feature.clone())).as_bytes());
    format!("{name}_{}", &hex::encode(digest)[..16])
}

/// JSON with sorted keys
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let parts: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{:?}:{}", k, canonical_json(&map[k])))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        Value::Array(items) => {
            let parts: Vec<_> = items.iter().map(canonical_json).collect();
            format!("[{}]", parts.join(","))
        }
        other => other.to_string(),
    }
}

fn build_feature(base: Value, overrides: Value) -> Value {
    let mut feature = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(extra) = overrides {
        feature.extend(extra);
    }
    let name = feature.get("name").cloned().unwrap_or(Value::Null);
    feature.insert("column".to_string(), name);
    let proc_column = compute_feature_hash(&feature);
    feature.insert("proc_column".to_string(), Value::from(proc_column));
    Value::Object(feature)
}

pub fn binary_feature(overrides: Value) -> Value {
    build_feature(json!({"name": format!("binary_{}", random_string(5)), "type": "binary"}), overrides)
}

pub fn number_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "name": format!("num_{}", random_string(5)),
            "type": "number",
            "preprocessing": {"normalization": null}
        }),
        overrides,
    )
}

pub fn category_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "type": "category",
            "name": format!("category_{}", random_string(5)),
            "encoder": {"type": "dense", "output_size": 5}
        }),
        overrides,
    )
}

pub fn text_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "name": format!("text_{}", random_string(5)),
            "type": "text",
            "preprocessing": {"max_sequence_length": 7},
            "encoder": {"type": "embed", "embedding_size": 8}
        }),
        overrides,
    )
}

pub fn set_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "type": "set",
            "name": format!("set_{}", random_string(5)),
            "encoder": {"type": "embed", "embedding_size": 5}
        }),
        overrides,
    )
}

pub fn sequence_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "type": "sequence",
            "name": format!("sequence_{}", random_string(5)),
            "preprocessing": {"max_sequence_length": 7},
            "encoder": {"type": "embed", "embedding_size": 8}
        }),
        overrides,
    )
}

pub fn image_feature(folder: &str, overrides: Value) -> Value {
    build_feature(
        json!({
            "type": "image",
            "name": format!("image_{}", random_string(5)),
            "preprocessing": {"in_memory": true, "height": 12, "width": 12, "num_channels": 3},
            "encoder": {"type": "stacked_cnn", "num_filters": 8, "output_size": 8},
            "destination_folder": folder
        }),
        overrides,
    )
}

pub fn audio_feature(folder: &str, overrides: Value) -> Value {
    build_feature(
        json!({
            "name": format!("audio_{}", random_string(5)),
            "type": "audio",
            "preprocessing": {
                "audio_feature": {
                    "type": "fbank",
                    "window_length_in_s": 0.04,
                    "window_shift_in_s": 0.02,
                    "num_filter_bands": 80
                },
                "audio_file_length_limit_in_s": 3.0
            },
            "encoder": {"type": "stacked_cnn", "output_size": 16},
            "destination_folder": folder
        }),
        overrides,
    )
}

pub fn timeseries_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "name": format!("timeseries_{}", random_string(5)),
            "type": "timeseries",
            "preprocessing": {"timeseries_length_limit": 7}
        }),
        overrides,
    )
}

pub fn bag_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "name": format!("bag_{}", random_string(5)),
            "type": "bag",
            "encoder": {"type": "embed", "embedding_size": 5}
        }),
        overrides,
    )
}

pub fn date_feature(overrides: Value) -> Value {
    let format = DATETIME_FORMATS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(DATETIME_FORMATS[0]);
    build_feature(
        json!({
            "name": format!("date_{}", random_string(5)),
            "type": "date",
            "preprocessing": {"datetime_format": format}
        }),
        overrides,
    )
}

pub fn h3_feature(overrides: Value) -> Value {
    build_feature(json!({"name": format!("h3_{}", random_string(5)), "type": "h3"}), overrides)
}

pub fn vector_feature(overrides: Value) -> Value {
    build_feature(
        json!({
            "type": "vector",
            "name": format!("vector_{}", random_string(5)),
            "preprocessing": {"vector_size": 5}
        }),
        overrides,
    )
}

/// Minimal current-shape config around the given features
#[must_use]
pub fn base_config(input_features: Vec<Value>, output_features: Vec<Value>) -> Value {
    json!({
        "input_features": input_features,
        "output_features": output_features,
        "combiner": {"type": "concat", "output_size": 14},
        "trainer": {"epochs": 2}
    })
}

/// A document using every deprecated shape the upgrade rewrites
#[must_use]
pub fn legacy_config() -> Value {
    json!({
        "input_features": [
            {"name": "age", "type": "numerical", "bias": true},
            {
                "name": "review",
                "type": "text",
                "encoder": {
                    "type": "parallel_cnn",
                    "conv_bias": false,
                    "conv_layers": [{"filter_size": 3, "default_bias": true}]
                }
            }
        ],
        "output_features": [
            {"name": "label", "type": "category", "decoder": "classifier"}
        ],
        "training": {"epochs": 3, "eval_batch_size": 0},
        "hyperopt": {
            "parameters": {
                "training.learning_rate": {"space": "loguniform", "lower": 0.0001, "upper": 0.1}
            },
            "executor": {"type": "serial", "search_alg": {"type": "hyperopt"}},
            "sampler": {"num_samples": 8, "scheduler": {"type": "async_hyperband"}},
            "goal": "minimize",
            "metric": "loss",
            "output_feature": "label"
        },
        "preprocessing": {
            "force_split": true,
            "split_probabilities": [0.7, 0.1, 0.2],
            "category": {"most_common": 100},
            "text": {"preprocessing": {"lowercase": true}}
        },
        "defaults": {
            "category": {"preprocessing": {"most_common": 50}}
        }
    })
}

/// Backend section for distributed tests
#[must_use]
pub fn ray_backend_config() -> Value {
    json!({
        "type": "ray",
        "processor": {"parallelism": 2},
        "trainer": {
            "use_gpu": false,
            "num_workers": 2,
            "resources_per_worker": {"CPU": 0.1, "GPU": 0}
        }
    })
}

/// Environment flag that is neither yes nor no
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("if set, {key} must be yes or no (got `{value}`)")]
pub struct FlagError {
    pub key: String,
    pub value: String,
}

/// Read a yes/no flag from the environment, `default` when unset
///
/// # Errors
/// Returns error if the variable is set to something other than a yes/no word
pub fn parse_flag_from_env(key: &str, default: bool) -> Result<bool, FlagError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => parse_bool(&value).ok_or_else(|| FlagError {
            key: key.to_string(),
            value,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Whether slow tests were requested through `RUN_SLOW`
#[must_use]
pub fn run_slow_tests() -> bool {
    parse_flag_from_env("RUN_SLOW", false).unwrap_or(false)
}
