//! Model Config CLI
//!
//! Library half of `mcfgctl`: settings, document formats, the upgrade
//! summary, and the metrics-report utility.

pub mod report;
pub mod settings;

use std::collections::BTreeMap;

use mcfg_upgrade::{DeprecationNotice, NoticeKind};

pub use report::{create_metrics_report, ReportError};
pub use settings::{CliSettings, DocumentFormat, UnknownFormat};

/// Count notices per kind, ordered by kind name
#[must_use]
pub fn summarize_notices(notices: &[DeprecationNotice]) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    for notice in notices {
        *summary.entry(notice.kind.to_string()).or_insert(0) += 1;
    }
    summary
}

/// Human-readable upgrade summary
#[must_use]
pub fn format_summary(notices: &[DeprecationNotice]) -> String {
    if notices.is_empty() {
        return "config already up to date".to_string();
    }
    let mut lines = vec![format!("{} deprecated field(s) upgraded:", notices.len())];
    for (kind, count) in summarize_notices(notices) {
        lines.push(format!("  {kind}: {count}"));
    }
    lines.join("\n")
}

/// Whether any notice of `kind` is present
#[must_use]
pub fn has_kind(notices: &[DeprecationNotice], kind: NoticeKind) -> bool {
    notices.iter().any(|n| n.kind == kind)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_groups_by_kind() {
        let notices = vec![
            DeprecationNotice::new(NoticeKind::BiasParameterRenamed, "a"),
            DeprecationNotice::new(NoticeKind::TrainingSectionRenamed, "b"),
            DeprecationNotice::new(NoticeKind::BiasParameterRenamed, "c"),
        ];
        let summary = summarize_notices(&notices);
        assert_eq!(summary.get(&NoticeKind::BiasParameterRenamed.to_string()), Some(&2));

        let text = format_summary(&notices);
        assert!(text.starts_with("3 deprecated field(s) upgraded:"));
        assert!(has_kind(&notices, NoticeKind::TrainingSectionRenamed));
        assert!(!has_kind(&notices, NoticeKind::SamplerRemoved));
    }

    #[test]
    fn empty_summary() {
        assert_eq!(format_summary(&[]), "config already up to date");
    }
}
