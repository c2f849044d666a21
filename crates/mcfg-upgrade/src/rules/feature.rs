//! Feature record rewrites

use serde_json::{Map, Value};

use crate::constants::{BIAS_RENAMES, NUMBER, NUMERICAL, TYPE};
use crate::document::expect_map_mut;
use crate::error::UpgradeResult;
use crate::notice::{DeprecationNotice, NoticeKind, NoticeSink};
use crate::traverse::traverse_maps;

/// Rename bias-related keys of one mapping
pub fn upgrade_use_bias(map: &mut Map<String, Value>, sink: &dyn NoticeSink) {
    for (old, new) in BIAS_RENAMES {
        if let Some(value) = map.shift_remove(old) {
            sink.emit(DeprecationNotice::new(
                NoticeKind::BiasParameterRenamed,
                format!("parameter `{old}` renamed to `{new}`; `{old}` will be removed in v0.6"),
            ));
            map.insert(new.to_string(), value);
        }
    }
}

/// Upgrade one input or output feature record
///
/// `path` locates the record for error reports, e.g. `input_features[2]`.
///
/// # Errors
/// Returns error if the record is not a mapping
pub fn upgrade_feature(feature: &mut Value, path: &str, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let record = expect_map_mut(feature, path)?;

    if record.get(TYPE).and_then(Value::as_str) == Some(NUMERICAL) {
        sink.emit(DeprecationNotice::new(
            NoticeKind::FeatureTypeRenamed,
            format!("feature type `{NUMERICAL}` renamed to `{NUMBER}`; `{NUMERICAL}` will be removed in v0.6"),
        ));
        record.insert(TYPE.to_string(), Value::from(NUMBER));
    }

    traverse_maps(feature, &mut |map: &mut Map<String, Value>| upgrade_use_bias(map, sink));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeKind;
    use crate::notice::NoticeCollector;
    use serde_json::json;

    #[test]
    fn numerical_becomes_number() {
        let mut feature = json!({"name": "x", "type": "numerical"});
        let notices = NoticeCollector::new();
        upgrade_feature(&mut feature, "input_features[0]", &notices).unwrap();

        assert_eq!(feature["type"], json!("number"));
        assert_eq!(notices.kinds(), vec![NoticeKind::FeatureTypeRenamed]);
    }

    #[test]
    fn other_types_unchanged() {
        let mut feature = json!({"name": "x", "type": "category"});
        let notices = NoticeCollector::new();
        upgrade_feature(&mut feature, "input_features[0]", &notices).unwrap();

        assert_eq!(feature, json!({"name": "x", "type": "category"}));
        assert!(notices.is_empty());
    }

    #[test]
    fn bias_renamed_at_any_depth() {
        let mut feature = json!({
            "name": "x",
            "type": "text",
            "bias": false,
            "encoder": {
                "type": "stacked_cnn",
                "conv_bias": true,
                "conv_layers": [{"default_bias": false, "bias": true}]
            }
        });
        let notices = NoticeCollector::new();
        upgrade_feature(&mut feature, "input_features[0]", &notices).unwrap();

        assert_eq!(feature["use_bias"], json!(false));
        assert!(feature.get("bias").is_none());
        assert_eq!(feature["encoder"]["conv_use_bias"], json!(true));
        assert!(feature["encoder"].get("conv_bias").is_none());

        let layer = &feature["encoder"]["conv_layers"][0];
        assert_eq!(layer, &json!({"default_use_bias": false, "use_bias": true}));
        assert_eq!(notices.count(NoticeKind::BiasParameterRenamed), 4);
    }

    #[test]
    fn bias_mapping_value_preserved() {
        let mut map = match json!({"bias": {"init": "zeros"}}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        upgrade_use_bias(&mut map, &NoticeCollector::new());
        assert_eq!(map["use_bias"], json!({"init": "zeros"}));
    }

    #[test]
    fn non_mapping_feature_is_malformed() {
        let mut feature = json!("category");
        let err = upgrade_feature(&mut feature, "input_features[1]", &NoticeCollector::new()).unwrap_err();
        assert_eq!(err.path, "input_features[1]");
        assert_eq!(err.expected, NodeKind::Mapping);
    }
}
