//! Hyperopt section rewrites
//!
//! Steps run in a fixed order and later steps read what earlier ones wrote:
//! the sampler fold sees an executor that may have just been created, and the
//! `search_alg` default is only injected once nothing else supplied one.

use serde_json::{json, Map, Value};

use crate::constants::{
    EXECUTOR, NUM_SAMPLES, PARAMETERS, RAY, SAMPLER, SCHEDULER, SEARCH_ALG, TRAINER_PREFIX,
    TRAINING_PREFIX, TYPE, VARIANT_GENERATOR,
};
use crate::document::{expect_map_mut, section_mut};
use crate::error::UpgradeResult;
use crate::notice::{DeprecationNotice, NoticeKind, NoticeSink};

/// Upgrade the hyperopt section in place
///
/// # Errors
/// Returns error if `hyperopt` or one of its sub-sections is not a mapping
pub fn upgrade_hyperopt(hyperopt: &mut Value, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let hyperopt = expect_map_mut(hyperopt, "hyperopt")?;

    rename_training_parameters(hyperopt, sink)?;
    normalize_executor(hyperopt, sink)?;
    fold_sampler(hyperopt, sink)?;

    if !hyperopt.contains_key(SEARCH_ALG) {
        hyperopt.insert(SEARCH_ALG.to_string(), json!({ TYPE: VARIANT_GENERATOR }));
        sink.emit(DeprecationNotice::new(
            NoticeKind::SearchAlgDefaulted,
            format!(
                "missing `{SEARCH_ALG}` at hyperopt top level, added `{VARIANT_GENERATOR}`; \
                 this will be an error in v0.6"
            ),
        ));
    }
    Ok(())
}

fn rename_training_parameters(hyperopt: &mut Map<String, Value>, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let Some(params) = section_mut(hyperopt, PARAMETERS, "hyperopt.parameters")? else {
        return Ok(());
    };

    let legacy: Vec<String> = params
        .keys()
        .filter(|k| k.starts_with(TRAINING_PREFIX))
        .cloned()
        .collect();

    for key in legacy {
        if let Some(value) = params.shift_remove(&key) {
            let renamed = format!("{TRAINER_PREFIX}{}", &key[TRAINING_PREFIX.len()..]);
            sink.emit(DeprecationNotice::new(
                NoticeKind::HyperoptParameterRenamed,
                format!("hyperopt parameter `{key}` renamed to `{renamed}`; section `training` is now `trainer`"),
            ));
            params.insert(renamed, value);
        }
    }
    Ok(())
}

fn normalize_executor(hyperopt: &mut Map<String, Value>, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let Some(executor) = section_mut(hyperopt, EXECUTOR, "hyperopt.executor")? else {
        sink.emit(DeprecationNotice::new(
            NoticeKind::ExecutorAdded,
            format!("missing hyperopt `{EXECUTOR}` section, added `{RAY}` executor; this will be an error in v0.6"),
        ));
        hyperopt.insert(EXECUTOR.to_string(), json!({ TYPE: RAY }));
        return Ok(());
    };

    match executor.get(TYPE) {
        None | Some(Value::Null) => {}
        Some(current) if current.as_str() == Some(RAY) => {}
        Some(current) => {
            sink.emit(DeprecationNotice::new(
                NoticeKind::ExecutorTypeConverted,
                format!("executor type {current} is not supported, converted to `{RAY}`; this will be an error in v0.6"),
            ));
            executor.insert(TYPE.to_string(), Value::from(RAY));
        }
    }

    // Always removed from the executor, promoted only if the top level has none.
    if let Some(search_alg) = executor.shift_remove(SEARCH_ALG) {
        if !hyperopt.contains_key(SEARCH_ALG) {
            sink.emit(DeprecationNotice::new(
                NoticeKind::SearchAlgMoved,
                format!("moved `{SEARCH_ALG}` from `{EXECUTOR}` to hyperopt top level"),
            ));
            hyperopt.insert(SEARCH_ALG.to_string(), search_alg);
        }
    }
    Ok(())
}

fn fold_sampler(hyperopt: &mut Map<String, Value>, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let Some(mut sampler) = hyperopt.shift_remove(SAMPLER) else {
        return Ok(());
    };
    let sampler = expect_map_mut(&mut sampler, "hyperopt.sampler")?;

    sink.emit(DeprecationNotice::new(
        NoticeKind::SamplerRemoved,
        format!("`{SAMPLER}` is no longer supported, converted to `{SEARCH_ALG}`; this will be an error in v0.6"),
    ));

    if let Some(search_alg) = sampler.shift_remove(SEARCH_ALG) {
        if !hyperopt.contains_key(SEARCH_ALG) {
            sink.emit(DeprecationNotice::new(
                NoticeKind::SearchAlgMoved,
                format!("moved `{SEARCH_ALG}` from `{SAMPLER}` to hyperopt top level"),
            ));
            hyperopt.insert(SEARCH_ALG.to_string(), search_alg);
        }
    }

    let executor = match hyperopt.get_mut(EXECUTOR) {
        Some(value) => expect_map_mut(value, "hyperopt.executor")?,
        None => return Ok(()),
    };
    for field in [NUM_SAMPLES, SCHEDULER] {
        if executor.contains_key(field) {
            continue;
        }
        if let Some(value) = sampler.shift_remove(field) {
            sink.emit(DeprecationNotice::new(
                NoticeKind::SamplerFieldMoved,
                format!("moved `{field}` from `{SAMPLER}` to `{EXECUTOR}`"),
            ));
            executor.insert(field.to_string(), value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeKind;
    use crate::notice::NoticeCollector;
    use pretty_assertions::assert_eq;

    fn upgrade(mut hyperopt: Value) -> (Value, NoticeCollector) {
        let notices = NoticeCollector::new();
        upgrade_hyperopt(&mut hyperopt, &notices).unwrap();
        (hyperopt, notices)
    }

    #[test]
    fn empty_section_gets_defaults() {
        let (hyperopt, notices) = upgrade(json!({}));
        assert_eq!(
            hyperopt,
            json!({"executor": {"type": "ray"}, "search_alg": {"type": "variant_generator"}})
        );
        assert_eq!(
            notices.kinds(),
            vec![NoticeKind::ExecutorAdded, NoticeKind::SearchAlgDefaulted]
        );
    }

    #[test]
    fn training_parameters_renamed() {
        let (hyperopt, notices) = upgrade(json!({
            "parameters": {
                "training.learning_rate": {"space": "loguniform"},
                "trainer.batch_size": {"space": "choice"},
                "combiner.output_size": {"space": "randint"}
            }
        }));

        let params = hyperopt["parameters"].as_object().unwrap();
        assert!(params.contains_key("trainer.learning_rate"));
        assert!(params.contains_key("trainer.batch_size"));
        assert!(params.contains_key("combiner.output_size"));
        assert!(!params.contains_key("training.learning_rate"));
        assert_eq!(notices.count(NoticeKind::HyperoptParameterRenamed), 1);
    }

    #[test]
    fn adjacent_training_parameters_all_renamed() {
        let (hyperopt, notices) = upgrade(json!({
            "parameters": {
                "trainer.b": {"space": "choice", "categories": [1]},
                "training.a": {"space": "uniform"},
                "training.b": {"space": "choice", "categories": [2, 3]},
                "x": {"space": "randint"},
                "training.c": {"space": "loguniform"}
            }
        }));

        let params = hyperopt["parameters"].as_object().unwrap();
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, ["trainer.b", "x", "trainer.a", "trainer.c"]);
        assert_eq!(params["trainer.b"], json!({"space": "choice", "categories": [2, 3]}));
        assert_eq!(params["trainer.a"], json!({"space": "uniform"}));
        assert_eq!(params["trainer.c"], json!({"space": "loguniform"}));
        assert_eq!(notices.count(NoticeKind::HyperoptParameterRenamed), 3);
    }

    #[test]
    fn unsupported_executor_type_converted() {
        let (hyperopt, notices) = upgrade(json!({"executor": {"type": "serial"}}));
        assert_eq!(hyperopt["executor"]["type"], json!("ray"));
        assert_eq!(notices.count(NoticeKind::ExecutorTypeConverted), 1);
    }

    #[test]
    fn executor_without_type_left_alone() {
        let (hyperopt, notices) = upgrade(json!({"executor": {"num_samples": 4}}));
        assert_eq!(hyperopt["executor"], json!({"num_samples": 4}));
        assert_eq!(notices.count(NoticeKind::ExecutorTypeConverted), 0);
    }

    #[test]
    fn executor_search_alg_promoted() {
        let (hyperopt, _) = upgrade(json!({
            "executor": {"type": "ray", "search_alg": {"type": "hyperopt"}}
        }));
        assert_eq!(hyperopt["search_alg"], json!({"type": "hyperopt"}));
        assert!(hyperopt["executor"].get("search_alg").is_none());
    }

    #[test]
    fn executor_search_alg_dropped_when_top_level_exists() {
        let (hyperopt, _) = upgrade(json!({
            "search_alg": {"type": "bohb"},
            "executor": {"type": "ray", "search_alg": {"type": "hyperopt"}}
        }));
        assert_eq!(hyperopt["search_alg"], json!({"type": "bohb"}));
        assert!(hyperopt["executor"].get("search_alg").is_none());
    }

    #[test]
    fn sampler_folded_into_executor() {
        let (hyperopt, notices) = upgrade(json!({
            "executor": {},
            "sampler": {"search_alg": {"type": "X"}, "num_samples": 5}
        }));

        assert!(hyperopt.get("sampler").is_none());
        assert_eq!(hyperopt["search_alg"], json!({"type": "X"}));
        assert_eq!(hyperopt["executor"]["num_samples"], json!(5));
        assert_eq!(notices.count(NoticeKind::SearchAlgDefaulted), 0);
    }

    #[test]
    fn sampler_fields_do_not_override_executor() {
        let (hyperopt, _) = upgrade(json!({
            "executor": {"type": "ray", "num_samples": 10, "scheduler": {"type": "fifo"}},
            "sampler": {"num_samples": 5, "scheduler": {"type": "async_hyperband"}}
        }));

        assert_eq!(hyperopt["executor"]["num_samples"], json!(10));
        assert_eq!(hyperopt["executor"]["scheduler"], json!({"type": "fifo"}));
    }

    #[test]
    fn sampler_lands_in_created_executor() {
        let (hyperopt, _) = upgrade(json!({
            "sampler": {"scheduler": {"type": "async_hyperband"}}
        }));

        assert_eq!(
            hyperopt["executor"],
            json!({"type": "ray", "scheduler": {"type": "async_hyperband"}})
        );
        assert_eq!(hyperopt["search_alg"], json!({"type": "variant_generator"}));
    }

    #[test]
    fn second_pass_is_noop() {
        let (once, _) = upgrade(json!({
            "parameters": {"training.epochs": {"space": "choice"}},
            "executor": {"type": "fiber"},
            "sampler": {"num_samples": 3}
        }));
        let (twice, notices) = upgrade(once.clone());
        assert_eq!(twice, once);
        assert!(notices.is_empty());
    }

    #[test]
    fn non_mapping_section_is_malformed() {
        let mut hyperopt = json!([1, 2]);
        let err = upgrade_hyperopt(&mut hyperopt, &NoticeCollector::new()).unwrap_err();
        assert_eq!(err.path, "hyperopt");
        assert_eq!(err.found, NodeKind::Sequence);
    }

    #[test]
    fn non_mapping_sampler_is_malformed() {
        let mut hyperopt = json!({"sampler": "grid"});
        let err = upgrade_hyperopt(&mut hyperopt, &NoticeCollector::new()).unwrap_err();
        assert_eq!(err.path, "hyperopt.sampler");
    }
}
