//! Two-pass invalid-seed classification.
//!
//! Pass 1 finds torrents whose live trackers all report not-working, while
//! collecting the domains of every tracker that is healthy somewhere in the
//! snapshot. Pass 2 keeps only the torrents whose own tracker domain appears
//! in that healthy set: the tracker works for other torrents, so its verdict
//! on this one can be trusted. Torrents that fail pass 1 but not pass 2 stay
//! ambiguous and are never touched; a site that is temporarily down must not
//! get its seeds deleted.

use std::collections::HashSet;

use seedsweep_qbit::{Torrent, TrackerStatus};
use tracing::debug;
use url::Url;

/// A torrent confirmed invalid by a demonstrably healthy tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedInvalid {
    /// Info-hash of the torrent.
    pub hash: String,
    /// Display name of the torrent.
    pub name: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Domain of the tracker that confirmed the verdict.
    pub tracker_domain: String,
    /// Message the tracker reported, e.g. `torrent not registered`.
    pub reason: String,
}

/// Lightweight reference to a torrent in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRef {
    /// Info-hash of the torrent.
    pub hash: String,
    /// Display name of the torrent.
    pub name: String,
}

/// Outcome of the two-pass classification.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Number of torrents that failed pass 1.
    pub provisional: usize,
    /// Torrents confirmed invalid by pass 2; safe to remediate.
    pub confirmed: Vec<ConfirmedInvalid>,
    /// Torrents that failed pass 1 but could not be confirmed; left alone.
    pub ambiguous: Vec<SeedRef>,
}

/// Normalize a tracker announce URL to its `host` or `host:port` form.
///
/// Returns `None` for values that are not URLs, such as the `** [DHT] **`
/// pseudo-tracker labels.
#[must_use]
pub fn normalize_domain(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    Some(url.port().map_or_else(
        || host.to_string(),
        |port| format!("{host}:{port}"),
    ))
}

/// Classify the snapshot.
#[must_use]
pub fn classify(torrents: &[Torrent]) -> Classification {
    let mut provisional = Vec::new();
    let mut working_domains = HashSet::new();

    for torrent in torrents {
        let mut is_invalid = true;
        for tracker in torrent.trackers.iter().filter(|t| t.is_live()) {
            if tracker.status == TrackerStatus::NotWorking {
                continue;
            }
            // Any live tracker that is not reporting failure both clears the
            // torrent and proves its domain reachable.
            is_invalid = false;
            if let Some(domain) = normalize_domain(&tracker.url) {
                working_domains.insert(domain);
            }
        }
        if is_invalid {
            provisional.push(torrent);
        }
    }
    debug!(
        provisional = provisional.len(),
        working_domains = working_domains.len(),
        "pass 1 complete"
    );

    let mut confirmed = Vec::new();
    let mut ambiguous = Vec::new();
    for torrent in provisional.iter().copied() {
        let verdict = torrent
            .trackers
            .iter()
            .filter(|t| t.is_live())
            .find_map(|tracker| {
                let domain = normalize_domain(&tracker.url)?;
                working_domains
                    .contains(&domain)
                    .then(|| (domain, tracker.msg.clone()))
            });
        match verdict {
            Some((tracker_domain, reason)) => confirmed.push(ConfirmedInvalid {
                hash: torrent.hash.clone(),
                name: torrent.name.clone(),
                size: torrent.size,
                tracker_domain,
                reason,
            }),
            None => ambiguous.push(SeedRef {
                hash: torrent.hash.clone(),
                name: torrent.name.clone(),
            }),
        }
    }

    Classification {
        provisional: provisional.len(),
        confirmed,
        ambiguous,
    }
}
