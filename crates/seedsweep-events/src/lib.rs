//! Core event bus for the seedsweep pipeline.
//!
//! The bus provides a typed event enum and sequential identifiers over a
//! `tokio::broadcast` channel. The channel is bounded; when it overflows, the
//! oldest events are dropped and a lagging subscriber resumes at the newest
//! retained event.
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};
use uuid::Uuid;

/// Notification sink abstractions and implementations.
pub mod notify;

pub use notify::{LogNotifier, Notification, NotificationCategory, Notifier, WebhookNotifier};

/// Identifier assigned to each event emitted by the pipeline.
pub type EventId = u64;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Typed domain events surfaced across a sweep run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A sweep run began.
    SweepStarted {
        /// Identifier of the run.
        run_id: Uuid,
    },
    /// The torrent snapshot was fetched successfully.
    SnapshotFetched {
        /// Identifier of the run.
        run_id: Uuid,
        /// Number of torrents in the snapshot.
        torrents: usize,
    },
    /// The torrent client could not be reached.
    SourceUnavailable {
        /// Identifier of the run.
        run_id: Uuid,
        /// Human-readable failure description.
        message: String,
    },
    /// The torrent client returned zero torrents.
    SourceEmpty {
        /// Identifier of the run.
        run_id: Uuid,
    },
    /// The two-pass classifier finished.
    SeedsClassified {
        /// Identifier of the run.
        run_id: Uuid,
        /// Torrents that failed pass 1 (every live tracker not working).
        provisional: usize,
        /// Torrents confirmed invalid by pass 2.
        confirmed: usize,
        /// Provisionally invalid torrents left unclassified.
        ambiguous: usize,
    },
    /// A confirmed-invalid torrent record was deleted from the client.
    TorrentRemoved {
        /// Identifier of the run.
        run_id: Uuid,
        /// Info-hash of the removed torrent.
        hash: String,
        /// Display name of the removed torrent.
        name: String,
    },
    /// Directory reconciliation finished.
    FilesReconciled {
        /// Identifier of the run.
        run_id: Uuid,
        /// Number of orphaned entries found.
        orphans: usize,
        /// Total bytes occupied by orphaned entries.
        reclaimed_bytes: u64,
    },
    /// An orphaned filesystem entry was removed.
    OrphanRemoved {
        /// Identifier of the run.
        run_id: Uuid,
        /// Absolute path of the removed entry.
        path: String,
    },
    /// The sweep run finished.
    SweepCompleted {
        /// Identifier of the run.
        run_id: Uuid,
    },
    /// The sweep run aborted.
    SweepFailed {
        /// Identifier of the run.
        run_id: Uuid,
        /// Human-readable failure description.
        message: String,
    },
}

impl Event {
    /// Machine-friendly discriminator for log consumers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SweepStarted { .. } => "sweep_started",
            Self::SnapshotFetched { .. } => "snapshot_fetched",
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::SourceEmpty { .. } => "source_empty",
            Self::SeedsClassified { .. } => "seeds_classified",
            Self::TorrentRemoved { .. } => "torrent_removed",
            Self::FilesReconciled { .. } => "files_reconciled",
            Self::OrphanRemoved { .. } => "orphan_removed",
            Self::SweepCompleted { .. } => "sweep_completed",
            Self::SweepFailed { .. } => "sweep_failed",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct EventEnvelope {
    /// Sequential identifier assigned by the bus.
    pub id: EventId,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// The wrapped event.
    pub event: Event,
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Construct a bus with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Publish a new event to the bus, assigning it a sequential identifier.
    #[must_use]
    pub fn publish(&self, event: Event) -> EventId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };
        let _ = self.sender.send(envelope);
        id
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper over the live broadcast channel.
pub struct EventStream {
    receiver: Receiver<EventEnvelope>,
}

impl EventStream {
    /// Receive the next event; a lagged subscriber resumes at the newest
    /// retained event.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(run_id: Uuid, torrents: usize) -> Event {
        Event::SnapshotFetched { run_id, torrents }
    }

    #[tokio::test]
    async fn ids_are_sequential_and_delivered_in_order() {
        let bus = EventBus::with_capacity(16);
        let run_id = Uuid::new_v4();
        let mut stream = bus.subscribe();

        let mut last_id = 0;
        for i in 0..5 {
            last_id = bus.publish(sample_event(run_id, i));
        }
        assert_eq!(last_id, 5);

        let mut received = Vec::new();
        for _ in 0..5 {
            if let Some(event) = stream.next().await {
                received.push(event.id);
            }
        }
        assert_eq!(received, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn lagged_subscriber_resumes_at_newest_retained_event() {
        let bus = EventBus::with_capacity(4);
        let run_id = Uuid::new_v4();
        let mut stream = bus.subscribe();

        for i in 0..8 {
            let _ = bus.publish(sample_event(run_id, i));
        }

        let first = stream.next().await.expect("event after lag");
        assert_eq!(first.id, 5, "channel should only retain the newest events");
    }

    #[test]
    fn event_kinds_are_stable() {
        let run_id = Uuid::new_v4();
        assert_eq!(Event::SweepStarted { run_id }.kind(), "sweep_started");
        assert_eq!(
            Event::SweepFailed {
                run_id,
                message: "boom".into()
            }
            .kind(),
            "sweep_failed"
        );
    }
}
