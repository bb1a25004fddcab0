//! # Design
//!
//! - A sweep aborts only when the snapshot itself is unusable; everything
//!   downstream degrades per-entry and keeps going.
//! - An unreachable client and an empty client are distinct conditions with
//!   distinct notifications, so neither masquerades as the other.

use seedsweep_qbit::ClientError;
use thiserror::Error;

/// Result type for sweep runs.
pub type SweepResult<T> = Result<T, SweepError>;

/// Errors that abort a sweep run.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The torrent client could not be reached or refused the snapshot.
    #[error("torrent source unavailable")]
    SourceUnavailable {
        /// Underlying client error.
        source: ClientError,
    },
    /// The torrent client answered with zero torrents.
    ///
    /// Treated as an abort rather than a trivially-clean run: an empty
    /// snapshot during reconciliation would mark every download as orphaned.
    #[error("torrent source returned no torrents")]
    EmptySource,
}
