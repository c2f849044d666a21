//! Section and field names used by configuration documents

/// Legacy name of the trainer section
pub const TRAINING: &str = "training";
/// Trainer section
pub const TRAINER: &str = "trainer";
/// Input feature list
pub const INPUT_FEATURES: &str = "input_features";
/// Output feature list
pub const OUTPUT_FEATURES: &str = "output_features";
/// Hyperparameter search section
pub const HYPEROPT: &str = "hyperopt";
/// Global preprocessing section
pub const PREPROCESSING: &str = "preprocessing";
/// Per-feature-type defaults section
pub const DEFAULTS: &str = "defaults";

/// Type tag carried by features, executors, search algorithms and splits
pub const TYPE: &str = "type";
/// Column reference inside a split
pub const COLUMN: &str = "column";
/// Split probabilities inside a split
pub const PROBABILITIES: &str = "probabilities";
/// Structured split inside preprocessing
pub const SPLIT: &str = "split";

/// Hyperopt search space
pub const PARAMETERS: &str = "parameters";
/// Hyperopt trial executor
pub const EXECUTOR: &str = "executor";
/// Hyperopt search algorithm
pub const SEARCH_ALG: &str = "search_alg";
/// Legacy hyperopt sampler section
pub const SAMPLER: &str = "sampler";
/// Hyperopt trial scheduler
pub const SCHEDULER: &str = "scheduler";
/// Number of hyperopt trials
pub const NUM_SAMPLES: &str = "num_samples";

/// Evaluation batch size inside the trainer section
pub const EVAL_BATCH_SIZE: &str = "eval_batch_size";

/// Legacy split keys inside preprocessing
pub const FORCE_SPLIT: &str = "force_split";
/// Legacy split keys inside preprocessing
pub const SPLIT_PROBABILITIES: &str = "split_probabilities";
/// Legacy split keys inside preprocessing
pub const STRATIFY: &str = "stratify";

/// Legacy feature type tag
pub const NUMERICAL: &str = "numerical";
/// Current feature type tag replacing [`NUMERICAL`]
pub const NUMBER: &str = "number";

/// The only supported executor type
pub const RAY: &str = "ray";
/// Search algorithm injected when none is configured
pub const VARIANT_GENERATOR: &str = "variant_generator";

/// Split types written by the split migration
pub const SPLIT_RANDOM: &str = "random";
/// Split types written by the split migration
pub const SPLIT_FIXED: &str = "fixed";
/// Split types written by the split migration
pub const SPLIT_STRATIFY: &str = "stratify";

/// Hyperopt parameter prefix for the legacy trainer section
pub const TRAINING_PREFIX: &str = "training.";
/// Hyperopt parameter prefix for the trainer section
pub const TRAINER_PREFIX: &str = "trainer.";

/// Bias-related keys and their replacements, applied at every mapping depth
pub const BIAS_RENAMES: [(&str, &str); 3] = [
    ("bias", "use_bias"),
    ("conv_bias", "conv_use_bias"),
    ("default_bias", "default_use_bias"),
];
