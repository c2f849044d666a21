//! Top-level upgrade driver

use serde_json::Value;

use crate::constants::{HYPEROPT, INPUT_FEATURES, OUTPUT_FEATURES, PREPROCESSING, TRAINER, TRAINING};
use crate::document::expect_map_mut;
use crate::error::{MalformedConfigError, NodeKind, UpgradeResult};
use crate::lookup::FeatureTypeLookup;
use crate::notice::{DeprecationNotice, NoticeKind, NoticeSink};
use crate::rules;

/// Applies every rewrite rule to a configuration document
///
/// Borrows the known input-feature types and a notice sink for the duration
/// of one or more upgrades. Holds no state between calls.
pub struct Upgrader<'a, L: ?Sized> {
    feature_types: &'a L,
    sink: &'a dyn NoticeSink,
}

impl<'a, L> Upgrader<'a, L>
where
    L: FeatureTypeLookup + ?Sized,
{
    /// Create upgrader
    #[inline]
    #[must_use]
    pub fn new(feature_types: &'a L, sink: &'a dyn NoticeSink) -> Self {
        Self { feature_types, sink }
    }

    /// Upgrade `config` in place and hand it back for chaining
    ///
    /// One pass in a fixed order; running it again on the result changes
    /// nothing and emits no notices.
    ///
    /// # Errors
    /// Returns error if the root or a section has the wrong node kind
    pub fn upgrade<'d>(&self, config: &'d mut Value) -> UpgradeResult<&'d mut Value> {
        let root = expect_map_mut(config, "$")?;

        if let Some(training) = root.shift_remove(TRAINING) {
            self.sink.emit(DeprecationNotice::new(
                NoticeKind::TrainingSectionRenamed,
                format!("config section `{TRAINING}` renamed to `{TRAINER}`; `{TRAINING}` will be removed in v0.6"),
            ));
            root.insert(TRAINER.to_string(), training);
        }

        for list in [INPUT_FEATURES, OUTPUT_FEATURES] {
            let features = match root.get_mut(list) {
                None => continue,
                Some(Value::Array(features)) => features,
                Some(other) => return Err(MalformedConfigError::new(list, NodeKind::Sequence, other)),
            };
            tracing::debug!(section = list, count = features.len(), "upgrading feature records");
            for (i, feature) in features.iter_mut().enumerate() {
                rules::upgrade_feature(feature, &format!("{list}[{i}]"), self.sink)?;
            }
        }

        if let Some(hyperopt) = root.get_mut(HYPEROPT) {
            tracing::debug!("upgrading hyperopt section");
            rules::upgrade_hyperopt(hyperopt, self.sink)?;
        }

        if let Some(trainer) = root.get_mut(TRAINER) {
            tracing::debug!("upgrading trainer section");
            rules::upgrade_trainer(trainer, self.sink)?;
        }

        if let Some(preprocessing) = root.get_mut(PREPROCESSING) {
            tracing::debug!("upgrading preprocessing section");
            rules::upgrade_preprocessing_split(preprocessing, self.sink)?;
            rules::upgrade_preprocessing_defaults(root, self.feature_types, self.sink)?;
        }

        Ok(config)
    }
}

/// Upgrade `config` in place
///
/// Convenience wrapper over [`Upgrader`].
///
/// # Errors
/// Returns error if the root or a section has the wrong node kind
pub fn upgrade_deprecated_fields<L>(
    config: &mut Value,
    feature_types: &L,
    sink: &dyn NoticeSink,
) -> UpgradeResult<()>
where
    L: FeatureTypeLookup + ?Sized,
{
    Upgrader::new(feature_types, sink).upgrade(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeCollector;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const TYPES: &[&str] = &["category", "number", "binary", "text"];

    #[test]
    fn training_replaces_trainer() {
        let mut config = json!({"trainer": {"epochs": 1}, "training": {"epochs": 9}});
        upgrade_deprecated_fields(&mut config, TYPES, &NoticeCollector::new()).unwrap();
        assert_eq!(config, json!({"trainer": {"epochs": 9}}));
    }

    #[test]
    fn renamed_training_section_is_upgraded() {
        let mut config = json!({"training": {"eval_batch_size": 0}});
        let notices = NoticeCollector::new();
        upgrade_deprecated_fields(&mut config, TYPES, &notices).unwrap();

        assert_eq!(config, json!({"trainer": {"eval_batch_size": null}}));
        assert_eq!(
            notices.kinds(),
            vec![NoticeKind::TrainingSectionRenamed, NoticeKind::EvalBatchSizeNulled]
        );
    }

    #[test]
    fn input_and_output_features_upgraded() {
        let mut config = json!({
            "input_features": [{"name": "a", "type": "numerical", "bias": true}],
            "output_features": [{"name": "b", "type": "numerical", "decoder": {"default_bias": false}}]
        });
        upgrade_deprecated_fields(&mut config, TYPES, &NoticeCollector::new()).unwrap();

        assert_eq!(
            config,
            json!({
                "input_features": [{"name": "a", "type": "number", "use_bias": true}],
                "output_features": [{"name": "b", "type": "number", "decoder": {"default_use_bias": false}}]
            })
        );
    }

    #[test]
    fn upgrade_returns_same_document() {
        let mut config = json!({"hyperopt": {}});
        let notices = NoticeCollector::new();
        let upgrader = Upgrader::new(TYPES, &notices);
        let upgraded = upgrader.upgrade(&mut config).unwrap();
        upgraded["marker"] = json!(1);
        assert_eq!(config["marker"], json!(1));
    }

    #[test]
    fn preprocessing_split_then_defaults() {
        let mut config = json!({
            "preprocessing": {"force_split": true, "category": {"most_common": 10}}
        });
        upgrade_deprecated_fields(&mut config, TYPES, &NoticeCollector::new()).unwrap();

        assert_eq!(
            config,
            json!({
                "preprocessing": {"split": {"type": "random"}},
                "defaults": {"category": {"preprocessing": {"most_common": 10}}}
            })
        );
    }

    #[test]
    fn feature_list_must_be_sequence() {
        let mut config = json!({"input_features": {"name": "a"}});
        let err = upgrade_deprecated_fields(&mut config, TYPES, &NoticeCollector::new()).unwrap_err();
        assert_eq!(err.path, "input_features");
        assert_eq!(err.expected, NodeKind::Sequence);
    }

    #[test]
    fn root_must_be_mapping() {
        let mut config = json!([]);
        let err = upgrade_deprecated_fields(&mut config, TYPES, &NoticeCollector::new()).unwrap_err();
        assert_eq!(err.path, "$");
    }

    #[test]
    fn current_document_untouched() {
        let current = json!({
            "input_features": [{"name": "a", "type": "number", "encoder": {"type": "dense", "use_bias": true}}],
            "output_features": [{"name": "b", "type": "binary"}],
            "trainer": {"epochs": 2, "eval_batch_size": null},
            "hyperopt": {"executor": {"type": "ray"}, "search_alg": {"type": "variant_generator"}},
            "preprocessing": {"split": {"type": "random"}}
        });
        let mut config = current.clone();
        let notices = NoticeCollector::new();
        upgrade_deprecated_fields(&mut config, TYPES, &notices).unwrap();

        assert_eq!(config, current);
        assert!(notices.is_empty());
    }
}
