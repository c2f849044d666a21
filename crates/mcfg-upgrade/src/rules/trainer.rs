//! Trainer section rewrites

use serde_json::Value;

use crate::constants::EVAL_BATCH_SIZE;
use crate::document::expect_map_mut;
use crate::error::UpgradeResult;
use crate::notice::{DeprecationNotice, NoticeKind, NoticeSink};

/// Upgrade the trainer section in place
///
/// An integral `eval_batch_size` of zero becomes null; the key stays.
///
/// # Errors
/// Returns error if `trainer` is not a mapping
pub fn upgrade_trainer(trainer: &mut Value, sink: &dyn NoticeSink) -> UpgradeResult<()> {
    let trainer = expect_map_mut(trainer, "trainer")?;

    if let Some(eval_batch_size) = trainer.get_mut(EVAL_BATCH_SIZE) {
        if eval_batch_size.as_i64() == Some(0) {
            sink.emit(DeprecationNotice::new(
                NoticeKind::EvalBatchSizeNulled,
                format!("`trainer.{EVAL_BATCH_SIZE}` value `0` changed to null; `0` will be unsupported in v0.6"),
            ));
            *eval_batch_size = Value::Null;
        }
    }
    Ok(())
}
