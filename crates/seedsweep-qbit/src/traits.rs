//! Capability traits over the torrent client.
//!
//! The sweep pipeline depends on these seams rather than on the concrete
//! HTTP client, so classification and remediation are testable with in-memory
//! fixtures.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::model::Torrent;

/// Provides the full torrent snapshot, trackers included.
#[async_trait]
pub trait TorrentSource: Send + Sync {
    /// Fetch every torrent known to the client together with its trackers.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be reached or refuses the
    /// request; an empty list is a successful fetch and is the caller's
    /// concern.
    async fn fetch_all(&self) -> ClientResult<Vec<Torrent>>;
}

/// Removes torrent records from the client.
#[async_trait]
pub trait TorrentRemover: Send + Sync {
    /// Delete the torrent record identified by `hash`, keeping its data on
    /// disk. Data is preserved so a path shared with another torrent (cross
    /// seeding) is never destroyed by record cleanup.
    ///
    /// # Errors
    ///
    /// Returns an error when the client rejects the deletion.
    async fn remove_keeping_data(&self, hash: &str) -> ClientResult<()>;
}
