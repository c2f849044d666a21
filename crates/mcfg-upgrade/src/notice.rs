//! Deprecation notices
//!
//! Every rewrite reports what it changed through a [`NoticeSink`]. Notices are
//! advisory: a sink cannot influence the upgrade, and emitting never fails.

use parking_lot::Mutex;
use std::fmt;

/// Family of rewrite that produced a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Root `training` section renamed to `trainer`
    TrainingSectionRenamed,
    /// Feature type `numerical` renamed to `number`
    FeatureTypeRenamed,
    /// A bias-related key renamed to its `use_bias` form
    BiasParameterRenamed,
    /// A `training.` hyperopt parameter renamed to `trainer.`
    HyperoptParameterRenamed,
    /// Unsupported executor type replaced
    ExecutorTypeConverted,
    /// Missing executor section added
    ExecutorAdded,
    /// `search_alg` moved to the hyperopt top level
    SearchAlgMoved,
    /// Legacy `sampler` section folded away
    SamplerRemoved,
    /// A field moved from `sampler` to `executor`
    SamplerFieldMoved,
    /// Default `search_alg` injected
    SearchAlgDefaulted,
    /// `eval_batch_size` of zero replaced with null
    EvalBatchSizeNulled,
    /// A legacy split key replaced by the structured `split`
    SplitParameterReplaced,
    /// Type-specific preprocessing moved to `defaults`
    PreprocessingMovedToDefaults,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TrainingSectionRenamed => "training_section_renamed",
            Self::FeatureTypeRenamed => "feature_type_renamed",
            Self::BiasParameterRenamed => "bias_parameter_renamed",
            Self::HyperoptParameterRenamed => "hyperopt_parameter_renamed",
            Self::ExecutorTypeConverted => "executor_type_converted",
            Self::ExecutorAdded => "executor_added",
            Self::SearchAlgMoved => "search_alg_moved",
            Self::SamplerRemoved => "sampler_removed",
            Self::SamplerFieldMoved => "sampler_field_moved",
            Self::SearchAlgDefaulted => "search_alg_defaulted",
            Self::EvalBatchSizeNulled => "eval_batch_size_nulled",
            Self::SplitParameterReplaced => "split_parameter_replaced",
            Self::PreprocessingMovedToDefaults => "preprocessing_moved_to_defaults",
        };
        f.write_str(name)
    }
}

/// One human-readable deprecation notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    /// Rewrite family
    pub kind: NoticeKind,
    /// Message for the user
    pub message: String,
}

impl DeprecationNotice {
    /// Create notice
    #[inline]
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Receiver of deprecation notices
pub trait NoticeSink {
    /// Record one notice
    fn emit(&self, notice: DeprecationNotice);
}

impl<T: NoticeSink + ?Sized> NoticeSink for &T {
    #[inline]
    fn emit(&self, notice: DeprecationNotice) {
        (**self).emit(notice);
    }
}

/// Forwards notices to `tracing` at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn emit(&self, notice: DeprecationNotice) {
        tracing::warn!(target: "mcfg::deprecation", kind = %notice.kind, "{}", notice.message);
    }
}

/// Drops every notice
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl NoticeSink for SilentSink {
    #[inline]
    fn emit(&self, _notice: DeprecationNotice) {}
}

/// Records notices in emission order
#[derive(Debug, Default)]
pub struct NoticeCollector {
    inner: Mutex<Vec<DeprecationNotice>>,
}

impl NoticeCollector {
    /// Create empty collector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded notices
    #[must_use]
    pub fn notices(&self) -> Vec<DeprecationNotice> {
        self.inner.lock().clone()
    }

    /// Kinds of recorded notices, in order
    #[must_use]
    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.inner.lock().iter().map(|n| n.kind).collect()
    }

    /// Number of notices of `kind`
    #[must_use]
    pub fn count(&self, kind: NoticeKind) -> usize {
        self.inner.lock().iter().filter(|n| n.kind == kind).count()
    }

    /// Number of recorded notices
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take all notices, leaving the collector empty
    pub fn drain(&self) -> Vec<DeprecationNotice> {
        std::mem::take(&mut *self.inner.lock())
    }
}

impl NoticeSink for NoticeCollector {
    fn emit(&self, notice: DeprecationNotice) {
        self.inner.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_records_in_order() {
        let collector = NoticeCollector::new();
        collector.emit(DeprecationNotice::new(NoticeKind::ExecutorAdded, "a"));
        collector.emit(DeprecationNotice::new(NoticeKind::SearchAlgDefaulted, "b"));

        assert_eq!(
            collector.kinds(),
            vec![NoticeKind::ExecutorAdded, NoticeKind::SearchAlgDefaulted]
        );
        assert_eq!(collector.count(NoticeKind::ExecutorAdded), 1);
    }

    #[test]
    fn collector_drain_empties() {
        let collector = NoticeCollector::new();
        collector.emit(DeprecationNotice::new(NoticeKind::SamplerRemoved, "x"));

        let drained = collector.drain();
        assert_eq!(drained.len(), 1);
        assert!(collector.is_empty());
    }

    #[test]
    fn notice_display() {
        let notice = DeprecationNotice::new(NoticeKind::FeatureTypeRenamed, "renamed");
        assert_eq!(notice.to_string(), "[feature_type_renamed] renamed");
    }

    #[test]
    fn silent_sink_accepts_notices() {
        SilentSink.emit(DeprecationNotice::new(NoticeKind::ExecutorAdded, "ignored"));
    }
}
