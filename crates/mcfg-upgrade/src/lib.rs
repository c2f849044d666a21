//! Model Config Upgrade
//!
//! Rewrites configuration documents written against older schema versions
//! into the current shape, in place, in a single pass.
//!
//! # Core Concepts
//!
//! - [`ConfigDocument`]: owned configuration tree (JSON/YAML)
//! - [`Upgrader`]: applies every rewrite rule in a fixed order
//! - [`NoticeSink`]: receives one [`DeprecationNotice`] per rewrite
//! - [`FeatureTypeLookup`]: read-only set of known input-feature types
//!
//! # Rule order
//!
//! ```text
//! training → trainer
//!   → input/output features (type tag, bias keys at any depth)
//!   → hyperopt (parameters, executor, sampler, search_alg)
//!   → trainer (eval_batch_size)
//!   → preprocessing (split keys, then type-specific overrides → defaults)
//! ```
//!
//! # Example
//!
//! ```
//! use mcfg_upgrade::{upgrade_deprecated_fields, NoticeCollector};
//! use serde_json::json;
//!
//! let mut config = json!({"training": {"eval_batch_size": 0}});
//! let notices = NoticeCollector::new();
//! upgrade_deprecated_fields(&mut config, &["category", "number"][..], &notices).unwrap();
//!
//! assert_eq!(config, json!({"trainer": {"eval_batch_size": null}}));
//! assert_eq!(notices.len(), 2);
//! ```

pub mod constants;
pub mod document;
pub mod error;
pub mod lookup;
pub mod merge;
pub mod notice;
pub mod rules;
pub mod traverse;
pub mod upgrade;

pub use document::{ConfigDocument, DocumentError};
pub use error::{MalformedConfigError, NodeKind, UpgradeResult};
pub use lookup::FeatureTypeLookup;
pub use merge::{merge_dict, merge_missing};
pub use notice::{DeprecationNotice, NoticeCollector, NoticeKind, NoticeSink, SilentSink, TracingSink};
pub use traverse::traverse_maps;
pub use upgrade::{upgrade_deprecated_fields, Upgrader};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
