//! Post-order walk over the mappings of a configuration tree

use serde_json::{Map, Value};

/// Apply `rule` to every mapping reachable from `node`, children first.
///
/// Sequences are descended into but never handed to `rule`; scalars are left
/// alone. When `rule` sees a mapping, every mapping below it has already been
/// rewritten.
pub fn traverse_maps<F>(node: &mut Value, rule: &mut F)
where
    F: FnMut(&mut Map<String, Value>),
{
    match node {
        Value::Object(map) => {
            for child in map.values_mut() {
                traverse_maps(child, rule);
            }
            rule(map);
        }
        Value::Array(items) => {
            for item in items {
                traverse_maps(item, rule);
            }
        }
        _ => {}
    }
}
