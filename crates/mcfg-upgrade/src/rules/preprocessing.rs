//! Preprocessing section rewrites
//!
//! Two passes over the global preprocessing section: the legacy split keys
//! collapse into one structured `split`, then type-specific override blocks
//! move to the root `defaults` section.

use serde_json::{Map, Value};

use crate::constants::{
    COLUMN, DEFAULTS, FORCE_SPLIT, PREPROCESSING, PROBABILITIES, SPLIT, SPLIT_FIXED,
    SPLIT_PROBABILITIES, SPLIT_RANDOM, SPLIT_STRATIFY, STRATIFY, TYPE,
};
use crate::document::{expect_map_mut, is_truthy};
use crate::error::{MalformedConfigError, NodeKind, UpgradeResult};
use crate::lookup::FeatureTypeLookup;
use crate::merge::merge_missing;
use crate::notice::{DeprecationNotice, NoticeKind, NoticeSink};

/// Collapse `force_split`, `split_probabilities` and `stratify` into `split`
///
/// # Errors
/// Returns error if `preprocessing` is not a mapping
pub fn upgrade_preprocessing_split(preprocessing: &mut Value, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let preprocessing = expect_map_mut(preprocessing, PREPROCESSING)?;

    // A null value counts as absent but is still removed.
    let mut take = |key: &str| preprocessing.shift_remove(key).filter(|v| !v.is_null());
    let force_split = take(FORCE_SPLIT);
    let split_probabilities = take(SPLIT_PROBABILITIES);
    let stratify = take(STRATIFY);

    let mut split = Map::new();

    if let Some(probabilities) = split_probabilities {
        sink.emit(DeprecationNotice::new(
            NoticeKind::SplitParameterReplaced,
            format!("`preprocessing.{SPLIT_PROBABILITIES}` replaced by `preprocessing.split.{PROBABILITIES}`; this will be an error in v0.7"),
        ));
        split.insert(PROBABILITIES.to_string(), probabilities);
    }

    if let Some(column) = stratify {
        sink.emit(DeprecationNotice::new(
            NoticeKind::SplitParameterReplaced,
            format!(
                "`preprocessing.{STRATIFY}` replaced by `preprocessing.split.{COLUMN}` with split type \
                 `{SPLIT_STRATIFY}`; this will be an error in v0.7"
            ),
        ));
        split.insert(TYPE.to_string(), Value::from(SPLIT_STRATIFY));
        split.insert(COLUMN.to_string(), column);
    }

    if let Some(force) = force_split {
        sink.emit(DeprecationNotice::new(
            NoticeKind::SplitParameterReplaced,
            format!("`preprocessing.{FORCE_SPLIT}` replaced by `preprocessing.split.{TYPE}`; this will be an error in v0.7"),
        ));
        if !split.contains_key(TYPE) {
            let split_type = if is_truthy(&force) { SPLIT_RANDOM } else { SPLIT_FIXED };
            split.insert(TYPE.to_string(), Value::from(split_type));
        }
    }

    if !split.is_empty() {
        preprocessing.insert(SPLIT.to_string(), Value::Object(split));
    }
    Ok(())
}

/// Move type-specific preprocessing overrides into `defaults`
///
/// Every key of the preprocessing section naming a known input-feature type is
/// popped and merged into `defaults.<type>.preprocessing`, keeping values that
/// were already there. An emptied preprocessing section is removed.
///
/// # Errors
/// Returns error if `preprocessing`, `defaults`, a moved override or an
/// existing `defaults` entry is not a mapping
pub fn upgrade_preprocessing_defaults<L>(
    config: &mut Map<String, Value>,
    feature_types: &L,
    sink: &dyn NoticeSink,
) -> UpgradeResult<()>
where
    L: FeatureTypeLookup + ?Sized,
{
    let Some(section) = config.get_mut(PREPROCESSING) else {
        return Ok(());
    };
    let preprocessing = expect_map_mut(section, PREPROCESSING)?;

    let type_keys: Vec<String> = preprocessing
        .keys()
        .filter(|k| feature_types.is_feature_type(k))
        .cloned()
        .collect();

    let mut overrides = Vec::with_capacity(type_keys.len());
    for feature_type in type_keys {
        if let Some(block) = preprocessing.shift_remove(&feature_type) {
            overrides.push((feature_type, block));
        }
    }

    if preprocessing.is_empty() {
        config.shift_remove(PREPROCESSING);
    }

    for (feature_type, block) in overrides {
        sink.emit(DeprecationNotice::new(
            NoticeKind::PreprocessingMovedToDefaults,
            format!(
                "moved preprocessing for feature type `{feature_type}` from `{PREPROCESSING}` to \
                 `{DEFAULTS}`; this will be unsupported in v0.8"
            ),
        ));
        relocate_override(config, &feature_type, block)?;
    }
    Ok(())
}

fn relocate_override(config: &mut Map<String, Value>, feature_type: &str, block: Value) -> UpgradeResult<()> {
    let block = match block {
        Value::Object(map) => map,
        other => {
            return Err(MalformedConfigError::new(
                format!("{PREPROCESSING}.{feature_type}"),
                NodeKind::Mapping,
                &other,
            ))
        }
    };

    let defaults = config
        .entry(DEFAULTS)
        .or_insert_with(|| Value::Object(Map::new()));
    let defaults = expect_map_mut(defaults, DEFAULTS)?;

    let Some(entry) = defaults.get_mut(feature_type) else {
        let entry = if block.contains_key(PREPROCESSING) {
            block
        } else {
            let mut wrapped = Map::new();
            wrapped.insert(PREPROCESSING.to_string(), Value::Object(block));
            wrapped
        };
        defaults.insert(feature_type.to_string(), Value::Object(entry));
        return Ok(());
    };
    let entry = expect_map_mut(entry, &format!("{DEFAULTS}.{feature_type}"))?;

    let incoming = preprocessing_payload(block, feature_type)?;
    match entry.get_mut(PREPROCESSING) {
        None => {
            entry.insert(PREPROCESSING.to_string(), Value::Object(incoming));
        }
        Some(existing) => {
            let path = format!("{DEFAULTS}.{feature_type}.{PREPROCESSING}");
            merge_missing(expect_map_mut(existing, &path)?, incoming);
        }
    }
    Ok(())
}

/// The preprocessing parameters carried by an override block: its nested
/// `preprocessing` mapping when present, else the block itself
fn preprocessing_payload(mut block: Map<String, Value>, feature_type: &str) -> UpgradeResult<Map<String, Value>> {
    match block.shift_remove(PREPROCESSING) {
        None => Ok(block),
        Some(Value::Object(nested)) => Ok(nested),
        Some(other) => Err(MalformedConfigError::new(
            format!("{PREPROCESSING}.{feature_type}.{PREPROCESSING}"),
            NodeKind::Mapping,
            &other,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeCollector;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const TYPES: &[&str] = &["category", "number", "text", "binary"];

    fn split(mut preprocessing: Value) -> (Value, NoticeCollector) {
        let notices = NoticeCollector::new();
        upgrade_preprocessing_split(&mut preprocessing, &notices).unwrap();
        (preprocessing, notices)
    }

    fn defaults(config: Value) -> (Value, NoticeCollector) {
        let notices = NoticeCollector::new();
        let mut config = match config {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        upgrade_preprocessing_defaults(&mut config, TYPES, &notices).unwrap();
        (Value::Object(config), notices)
    }

    #[test]
    fn force_split_with_probabilities() {
        let (pre, notices) = split(json!({"force_split": true, "split_probabilities": [0.7, 0.1, 0.2]}));
        assert_eq!(
            pre,
            json!({"split": {"type": "random", "probabilities": [0.7, 0.1, 0.2]}})
        );
        assert_eq!(notices.count(NoticeKind::SplitParameterReplaced), 2);
    }

    #[test]
    fn force_split_false_is_fixed() {
        let (pre, _) = split(json!({"force_split": false, "sample_ratio": 0.5}));
        assert_eq!(pre, json!({"sample_ratio": 0.5, "split": {"type": "fixed"}}));
    }

    #[test]
    fn stratify_takes_precedence() {
        let (pre, notices) = split(json!({"stratify": "col", "force_split": false}));
        assert_eq!(pre["split"], json!({"type": "stratify", "column": "col"}));
        assert_eq!(notices.count(NoticeKind::SplitParameterReplaced), 2);
    }

    #[test]
    fn no_legacy_keys_no_split() {
        let (pre, notices) = split(json!({"sample_ratio": 1.0}));
        assert_eq!(pre, json!({"sample_ratio": 1.0}));
        assert!(notices.is_empty());
    }

    #[test]
    fn existing_split_untouched_without_legacy_keys() {
        let (pre, _) = split(json!({"split": {"type": "fixed", "column": "split"}}));
        assert_eq!(pre, json!({"split": {"type": "fixed", "column": "split"}}));
    }

    #[test]
    fn null_legacy_keys_removed_silently() {
        let (pre, notices) = split(json!({"force_split": null, "stratify": null}));
        assert_eq!(pre, json!({}));
        assert!(notices.is_empty());
    }

    #[test]
    fn override_relocated_and_section_dropped() {
        let (config, notices) = defaults(json!({
            "preprocessing": {"category": {"missing_value_strategy": "fill"}}
        }));

        assert_eq!(
            config,
            json!({"defaults": {"category": {"preprocessing": {"missing_value_strategy": "fill"}}}})
        );
        assert_eq!(notices.kinds(), vec![NoticeKind::PreprocessingMovedToDefaults]);
    }

    #[test]
    fn non_type_keys_stay() {
        let (config, _) = defaults(json!({
            "preprocessing": {
                "sample_ratio": 0.3,
                "number": {"normalization": "zscore"}
            }
        }));

        assert_eq!(config["preprocessing"], json!({"sample_ratio": 0.3}));
        assert_eq!(
            config["defaults"]["number"]["preprocessing"],
            json!({"normalization": "zscore"})
        );
    }

    #[test]
    fn block_with_preprocessing_key_used_verbatim() {
        let (config, _) = defaults(json!({
            "preprocessing": {"text": {"preprocessing": {"lowercase": true}}}
        }));
        assert_eq!(
            config["defaults"]["text"],
            json!({"preprocessing": {"lowercase": true}})
        );
    }

    #[test]
    fn entry_without_preprocessing_gets_block() {
        let (config, _) = defaults(json!({
            "preprocessing": {"category": {"most_common": 100}},
            "defaults": {"category": {"encoder": {"type": "dense"}}}
        }));
        assert_eq!(
            config["defaults"]["category"],
            json!({"encoder": {"type": "dense"}, "preprocessing": {"most_common": 100}})
        );
    }

    #[test]
    fn existing_preprocessing_wins_on_conflict() {
        let (config, _) = defaults(json!({
            "preprocessing": {"binary": {"fallback_true_label": "yes", "missing_value_strategy": "drop_row"}},
            "defaults": {"binary": {"preprocessing": {"missing_value_strategy": "fill_with_mode"}}}
        }));
        assert_eq!(
            config["defaults"]["binary"]["preprocessing"],
            json!({"missing_value_strategy": "fill_with_mode", "fallback_true_label": "yes"})
        );
    }

    #[test]
    fn no_overrides_leaves_defaults_absent() {
        let (config, notices) = defaults(json!({"preprocessing": {"sample_ratio": 1.0}}));
        assert_eq!(config, json!({"preprocessing": {"sample_ratio": 1.0}}));
        assert!(notices.is_empty());
    }

    #[test]
    fn empty_preprocessing_removed() {
        let (config, _) = defaults(json!({"preprocessing": {}, "trainer": {}}));
        assert_eq!(config, json!({"trainer": {}}));
    }

    #[test]
    fn scalar_override_is_malformed() {
        let mut config = match json!({"preprocessing": {"category": 3}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let err = upgrade_preprocessing_defaults(&mut config, TYPES, &NoticeCollector::new()).unwrap_err();
        assert_eq!(err.path, "preprocessing.category");
    }
}
