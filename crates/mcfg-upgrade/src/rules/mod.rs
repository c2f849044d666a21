//! Rewrite rules
//!
//! Each rule owns one section of the document and mutates it in place. Only
//! the preprocessing-defaults rule reaches outside its section (it writes
//! `defaults` at the root).

pub mod feature;
pub mod hyperopt;
pub mod preprocessing;
pub mod trainer;

pub use feature::{upgrade_feature, upgrade_use_bias};
pub use hyperopt::upgrade_hyperopt;
pub use preprocessing::{upgrade_preprocessing_defaults, upgrade_preprocessing_split};
pub use trainer::upgrade_trainer;
