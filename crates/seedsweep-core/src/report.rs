//! Human-readable run summaries for the notification sink.

use seedsweep_events::{Notification, NotificationCategory};

use crate::classifier::Classification;
use crate::reconciler::Reconciliation;

const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Render a byte count with a binary unit, e.g. `1.50 GiB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Summarize a classification outcome for the notifier.
#[must_use]
pub fn classification_report(outcome: &Classification, removed_records: bool) -> Notification {
    let mut body = String::from("Invalid seeds detected:\n");
    for seed in &outcome.confirmed {
        body.push_str(&format!(
            "{} (tracker: {}, size: {}, reason: {})\n",
            seed.name,
            seed.tracker_domain,
            format_size(seed.size),
            seed.reason
        ));
    }
    body.push_str(&format!(
        "{} invalid seeds confirmed, {} left unconfirmed.\n",
        outcome.confirmed.len(),
        outcome.ambiguous.len()
    ));
    if removed_records {
        body.push_str("Invalid torrent records removed; payload data kept.\n");
    }
    Notification {
        category: NotificationCategory::Classification,
        title: "Seedsweep: invalid seeds".to_string(),
        body,
    }
}

/// Summarize a reconciliation outcome for the notifier.
#[must_use]
pub fn reconciliation_report(outcome: &Reconciliation, removed_files: bool) -> Notification {
    let mut body = String::from("Unclaimed download entries:\n");
    for orphan in &outcome.orphans {
        body.push_str(&format!("{}\n", orphan.path.display()));
    }
    body.push_str(&format!(
        "{} unclaimed entries occupying {}.\n",
        outcome.orphans.len(),
        format_size(outcome.total_bytes)
    ));
    if removed_files {
        body.push_str(&format!(
            "Removed {} entries, freeing {}.\n",
            outcome.deleted,
            format_size(outcome.total_bytes)
        ));
        if outcome.failed_deletions > 0 {
            body.push_str(&format!(
                "{} removals failed; see the log.\n",
                outcome.failed_deletions
            ));
        }
    }
    Notification {
        category: NotificationCategory::Reconciliation,
        title: "Seedsweep: unclaimed files".to_string(),
        body,
    }
}

pub(crate) fn source_unavailable_report(message: &str) -> Notification {
    Notification {
        category: NotificationCategory::SourceError,
        title: "Seedsweep: torrent client unreachable".to_string(),
        body: format!("Snapshot fetch failed: {message}\n"),
    }
}

pub(crate) fn empty_source_report() -> Notification {
    Notification {
        category: NotificationCategory::SourceError,
        title: "Seedsweep: torrent client empty".to_string(),
        body: "The torrent client returned no torrents; sweep aborted.\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ConfirmedInvalid;

    #[test]
    fn formats_sizes_across_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KiB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GiB");
    }

    #[test]
    fn classification_report_lists_confirmed_seeds() {
        let outcome = Classification {
            provisional: 2,
            confirmed: vec![ConfirmedInvalid {
                hash: "aaaa".to_string(),
                name: "Dead.Release".to_string(),
                size: 2048,
                tracker_domain: "tracker.example".to_string(),
                reason: "unregistered".to_string(),
            }],
            ambiguous: vec![],
        };

        let note = classification_report(&outcome, true);
        assert_eq!(note.category, NotificationCategory::Classification);
        assert!(note.body.contains("Dead.Release"));
        assert!(note.body.contains("tracker.example"));
        assert!(note.body.contains("2.00 KiB"));
        assert!(note.body.contains("records removed"));
    }

    #[test]
    fn reconciliation_report_counts_failures() {
        let outcome = Reconciliation {
            orphans: vec![],
            total_bytes: 1024,
            deleted: 1,
            failed_deletions: 2,
        };
        let note = reconciliation_report(&outcome, true);
        assert!(note.body.contains("2 removals failed"));
    }
}
