//! Encoder configuration records
//!
//! An encoder is selected by its `type` tag; each tag has its own parameter
//! record. Which tags a feature type accepts, and which one it falls back to,
//! is fixed per feature type.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::feature_type::FeatureType;

/// Encoder parameters, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderConfig {
    /// Stack of fully connected layers
    Dense(DenseEncoderConfig),
    /// Input passed through unchanged
    Passthrough(PassthroughEncoderConfig),
    /// Embedding lookup
    Embed(EmbedEncoderConfig),
    /// Parallel convolutions over the sequence
    ParallelCnn(ConvEncoderConfig),
    /// Stacked convolutions over the sequence
    StackedCnn(ConvEncoderConfig),
}

impl EncoderConfig {
    /// Tag as written in configs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Dense(_) => "dense",
            Self::Passthrough(_) => "passthrough",
            Self::Embed(_) => "embed",
            Self::ParallelCnn(_) => "parallel_cnn",
            Self::StackedCnn(_) => "stacked_cnn",
        }
    }

    /// Encoder with default parameters for a tag
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let encoder = match name {
            "dense" => Self::Dense(DenseEncoderConfig::default()),
            "passthrough" => Self::Passthrough(PassthroughEncoderConfig::default()),
            "embed" => Self::Embed(EmbedEncoderConfig::default()),
            "parallel_cnn" => Self::ParallelCnn(ConvEncoderConfig::default()),
            "stacked_cnn" => Self::StackedCnn(ConvEncoderConfig::default()),
            _ => return None,
        };
        Some(encoder)
    }

    /// Default encoder of a feature type
    #[must_use]
    pub fn default_for(feature_type: FeatureType) -> Self {
        match default_encoder(feature_type) {
            "dense" => Self::Dense(DenseEncoderConfig::default()),
            "passthrough" => Self::Passthrough(PassthroughEncoderConfig::default()),
            "parallel_cnn" => Self::ParallelCnn(ConvEncoderConfig::default()),
            "stacked_cnn" => Self::StackedCnn(ConvEncoderConfig::default()),
            _ => Self::Embed(EmbedEncoderConfig::default()),
        }
    }
}

/// Encoder tags accepted by a feature type
#[must_use]
pub const fn encoders_for(feature_type: FeatureType) -> &'static [&'static str] {
    match feature_type {
        FeatureType::Binary | FeatureType::Number => &["passthrough", "dense"],
        FeatureType::Category => &["dense", "passthrough"],
        FeatureType::Set | FeatureType::Bag | FeatureType::H3 => &["embed"],
        FeatureType::Date => &["embed", "dense"],
        FeatureType::Sequence | FeatureType::Text => &["embed", "parallel_cnn", "stacked_cnn", "passthrough"],
        FeatureType::Timeseries | FeatureType::Audio => &["parallel_cnn", "stacked_cnn", "passthrough"],
        FeatureType::Image => &["stacked_cnn"],
        FeatureType::Vector => &["dense", "passthrough"],
    }
}

/// Encoder tag used when a feature has none
#[must_use]
pub const fn default_encoder(feature_type: FeatureType) -> &'static str {
    encoders_for(feature_type)[0]
}

/// Weight and bias initializers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    /// Constant value
    Constant,
    /// Identity matrix
    Identity,
    /// All zeros
    Zeros,
    /// All ones
    Ones,
    /// Random orthogonal matrix
    Orthogonal,
    /// Normal distribution
    Normal,
    /// Uniform distribution
    Uniform,
    /// Normal distribution truncated at two deviations
    TruncatedNormal,
    /// Variance scaling
    VarianceScaling,
    /// Glorot normal
    GlorotNormal,
    /// Glorot uniform
    GlorotUniform,
    /// Xavier normal
    XavierNormal,
    /// Xavier uniform
    XavierUniform,
    /// He normal
    HeNormal,
    /// He uniform
    HeUniform,
    /// LeCun normal
    LecunNormal,
    /// LeCun uniform
    LecunUniform,
}

/// Layer activations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Activation {
    /// Exponential linear unit
    #[serde(rename = "elu")]
    Elu,
    /// Leaky rectified linear unit
    #[serde(rename = "leakyRelu")]
    LeakyRelu,
    /// Log of the sigmoid
    #[serde(rename = "logSigmoid")]
    LogSigmoid,
    /// Rectified linear unit
    #[serde(rename = "relu")]
    Relu,
    /// Logistic sigmoid
    #[serde(rename = "sigmoid")]
    Sigmoid,
    /// Hyperbolic tangent
    #[serde(rename = "tanh")]
    Tanh,
    /// Softmax
    #[serde(rename = "softmax")]
    Softmax,
}

/// Normalization applied inside dense layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    /// Batch normalization
    Batch,
    /// Layer normalization
    Layer,
}

/// Parameters of the `dense` encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DenseEncoderConfig {
    /// Per-layer overrides; takes precedence over `num_layers`
    pub fc_layers: Option<Vec<Map<String, Value>>>,
    /// Number of stacked fully connected layers
    #[schemars(range(min = 1))]
    pub num_layers: u32,
    /// Size of the encoder output
    #[schemars(range(min = 1))]
    pub output_size: u32,
    /// Whether the layers use a bias vector
    pub use_bias: bool,
    /// Weight initializer
    pub weights_initializer: Initializer,
    /// Bias initializer
    pub bias_initializer: Initializer,
    /// Normalization after each layer
    pub norm: Option<Norm>,
    /// Normalization parameters
    pub norm_params: Option<Map<String, Value>>,
    /// Activation after each layer
    pub activation: Activation,
    /// Dropout rate
    #[schemars(range(min = 0.0, max = 1.0))]
    pub dropout: f64,
}

impl Default for DenseEncoderConfig {
    fn default() -> Self {
        Self {
            fc_layers: None,
            num_layers: 1,
            output_size: 256,
            use_bias: true,
            weights_initializer: Initializer::GlorotUniform,
            bias_initializer: Initializer::Zeros,
            norm: None,
            norm_params: None,
            activation: Activation::Relu,
            dropout: 0.0,
        }
    }
}

/// Parameters of the `passthrough` encoder (none)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PassthroughEncoderConfig {}

/// Parameters of the `embed` encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmbedEncoderConfig {
    /// Embedding width
    #[schemars(range(min = 1))]
    pub embedding_size: u32,
    /// Whether embeddings are updated in training
    pub embeddings_trainable: bool,
    /// Keep embeddings in host memory
    pub embeddings_on_cpu: bool,
    /// Path to pretrained embeddings
    pub pretrained_embeddings: Option<String>,
    /// Embedding initializer
    pub weights_initializer: Initializer,
    /// Dropout rate
    #[schemars(range(min = 0.0, max = 1.0))]
    pub dropout: f64,
}

impl Default for EmbedEncoderConfig {
    fn default() -> Self {
        Self {
            embedding_size: 50,
            embeddings_trainable: true,
            embeddings_on_cpu: false,
            pretrained_embeddings: None,
            weights_initializer: Initializer::Uniform,
            dropout: 0.0,
        }
    }
}

/// Parameters shared by the convolutional encoders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConvEncoderConfig {
    /// Per-layer overrides
    pub conv_layers: Option<Vec<Map<String, Value>>>,
    /// Number of convolution layers when `conv_layers` is absent
    pub num_conv_layers: Option<u32>,
    /// Convolution width
    #[schemars(range(min = 1))]
    pub filter_size: u32,
    /// Filters per convolution
    #[schemars(range(min = 1))]
    pub num_filters: u32,
    /// Pooling width
    pub pool_size: Option<u32>,
    /// Whether the convolutions use a bias vector
    pub conv_use_bias: bool,
    /// Bias default for fully connected layers after the convolutions
    pub default_use_bias: bool,
    /// Size of the encoder output
    #[schemars(range(min = 1))]
    pub output_size: u32,
    /// Activation after each layer
    pub activation: Activation,
    /// Dropout rate
    #[schemars(range(min = 0.0, max = 1.0))]
    pub dropout: f64,
}

impl Default for ConvEncoderConfig {
    fn default() -> Self {
        Self {
            conv_layers: None,
            num_conv_layers: None,
            filter_size: 3,
            num_filters: 256,
            pool_size: None,
            conv_use_bias: true,
            default_use_bias: true,
            output_size: 256,
            activation: Activation::Relu,
            dropout: 0.0,
        }
    }
}
