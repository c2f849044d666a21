//! Model Config Schema
//!
//! Typed records for the current configuration shape, the feature-type,
//! encoder and decoder registries, and JSON-schema validation.
//!
//! # Loading a config
//!
//! ```
//! use mcfg_schema::{load_config, FeatureTypeRegistry};
//! use mcfg_upgrade::SilentSink;
//! use serde_json::json;
//!
//! let config = json!({
//!     "input_features": [{"name": "age", "type": "numerical"}],
//!     "output_features": [{"name": "label", "type": "category"}],
//!     "training": {"epochs": 5}
//! });
//! let model = load_config(config, &FeatureTypeRegistry::with_defaults(), &SilentSink).unwrap();
//!
//! assert_eq!(model.trainer.epochs, 5);
//! assert_eq!(model.input_features[0].feature_type.as_str(), "number");
//! ```

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod feature_type;
pub mod validate;

pub use config::{
    DecoderConfig, ExecutorConfig, ExecutorType, FeatureDefaultsConfig, Goal, HyperoptConfig,
    InputFeatureConfig, ModelConfig, OutputFeatureConfig, PreprocessingConfig, SearchAlgConfig,
    SplitConfig, SplitType, TrainerConfig,
};
pub use decoder::{decoders_for, default_decoder};
pub use encoder::{default_encoder, encoders_for, EncoderConfig};
pub use error::{SchemaError, SchemaResult, Violation};
pub use feature_type::{FeatureType, FeatureTypeRegistry, UnknownFeatureType};
pub use validate::{load_config, model_config_schema, ConfigValidator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
