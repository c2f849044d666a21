//! Recursive mapping merges
//!
//! Two flavors: [`merge_missing`] keeps what the target already has and only
//! fills gaps, [`merge_dict`] lets the overlay win.

use serde_json::{Map, Value};

/// Merge `incoming` into `target`, keeping `target`'s values on conflict.
///
/// Mappings present on both sides are merged recursively; any other pair of
/// values keeps the target's.
pub fn merge_missing(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            None => {
                target.insert(key, value);
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(nested) = value {
                    merge_missing(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
}

/// Merge `overlay` onto a copy of `base`, the overlay winning on conflict.
///
/// Mappings present on both sides are merged recursively; sequences and
/// scalars from the overlay replace the base's.
#[must_use]
pub fn merge_dict(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_val) in overlay_map {
                let merged = match result.get(key) {
                    Some(base_val) => merge_dict(base_val, overlay_val),
                    None => overlay_val.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        (_, overlay_val) => overlay_val.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn merge_missing_keeps_existing_leaves() {
        let mut target = map(json!({"a": 1, "nested": {"x": "keep"}}));
        merge_missing(&mut target, map(json!({"a": 2, "b": 3, "nested": {"x": "drop", "y": true}})));

        assert_eq!(
            Value::Object(target),
            json!({"a": 1, "nested": {"x": "keep", "y": true}, "b": 3})
        );
    }

    #[test]
    fn merge_missing_does_not_replace_scalar_with_mapping() {
        let mut target = map(json!({"fill": "mean"}));
        merge_missing(&mut target, map(json!({"fill": {"strategy": "mode"}})));
        assert_eq!(target["fill"], json!("mean"));
    }

    #[test]
    fn merge_dict_overlay_wins() {
        let base = json!({"x": 1, "y": {"a": 1, "b": 2}, "list": [1, 2]});
        let overlay = json!({"y": {"b": 3}, "z": 4, "list": [3]});

        assert_eq!(
            merge_dict(&base, &overlay),
            json!({"x": 1, "y": {"a": 1, "b": 3}, "list": [3], "z": 4})
        );
    }

    #[test]
    fn merge_dict_disjoint_sections() {
        let merged = merge_dict(
            &json!({"performance_metrics": {"loss": 0.5}}),
            &json!({"non_performance_metrics": {"train_time": 12}}),
        );
        assert_eq!(merged["performance_metrics"]["loss"], json!(0.5));
        assert_eq!(merged["non_performance_metrics"]["train_time"], json!(12));
    }
}
