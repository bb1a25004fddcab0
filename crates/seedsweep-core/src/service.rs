//! Sweep orchestration.
//!
//! A run is: fetch snapshot, classify, optionally remove confirmed-invalid
//! torrent records, optionally reconcile the mapped directories. Progress is
//! published on the event bus; at most one notification goes out per outcome,
//! and summaries with nothing to report are not sent at all.

use std::collections::HashSet;
use std::sync::Arc;

use seedsweep_config::DirectoryMapping;
use seedsweep_events::{Event, EventBus, Notifier};
use seedsweep_qbit::{Torrent, TorrentRemover, TorrentSource};
use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::classify;
use crate::error::{SweepError, SweepResult};
use crate::reconciler::reconcile;
use crate::report;

/// Behaviour switches for a sweep run, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Send run summaries to the notifier.
    pub notify: bool,
    /// Remove confirmed-invalid torrent records from the client.
    pub delete_invalid_torrents: bool,
    /// Run the filesystem reconciliation pass.
    pub detect_invalid_files: bool,
    /// Remove orphaned entries found by reconciliation.
    pub delete_invalid_files: bool,
    /// Directory mappings for reconciliation.
    pub mappings: Vec<DirectoryMapping>,
    /// Entry-name keywords that exempt an entry from reconciliation.
    pub exclude_keywords: Vec<String>,
}

/// Counters describing a completed sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Torrents confirmed invalid.
    pub confirmed: usize,
    /// Torrent records removed from the client.
    pub removed_records: usize,
    /// Torrents left unconfirmed.
    pub ambiguous: usize,
    /// Orphaned filesystem entries found.
    pub orphans: usize,
    /// Bytes occupied by orphaned entries.
    pub reclaimed_bytes: u64,
}

/// Orchestrates sweep runs over injected client capabilities.
pub struct SweepService {
    source: Arc<dyn TorrentSource>,
    remover: Arc<dyn TorrentRemover>,
    notifier: Arc<dyn Notifier>,
    bus: EventBus,
    options: SweepOptions,
}

impl std::fmt::Debug for SweepService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SweepService {
    /// Assemble a service from its collaborators.
    #[must_use]
    pub fn new(
        source: Arc<dyn TorrentSource>,
        remover: Arc<dyn TorrentRemover>,
        notifier: Arc<dyn Notifier>,
        bus: EventBus,
        options: SweepOptions,
    ) -> Self {
        Self {
            source,
            remover,
            notifier,
            bus,
            options,
        }
    }

    /// Execute one full sweep run.
    ///
    /// # Errors
    ///
    /// Returns an error when the torrent snapshot is unavailable or empty;
    /// everything past the snapshot degrades per-entry instead of failing.
    pub async fn run_sweep(&self) -> SweepResult<SweepSummary> {
        let run_id = Uuid::new_v4();
        let _ = self.bus.publish(Event::SweepStarted { run_id });
        info!(%run_id, "sweep started");

        let snapshot = self.fetch_snapshot(run_id).await?;
        let _ = self.bus.publish(Event::SnapshotFetched {
            run_id,
            torrents: snapshot.len(),
        });

        let outcome = classify(&snapshot);
        let _ = self.bus.publish(Event::SeedsClassified {
            run_id,
            provisional: outcome.provisional,
            confirmed: outcome.confirmed.len(),
            ambiguous: outcome.ambiguous.len(),
        });
        info!(
            provisional = outcome.provisional,
            confirmed = outcome.confirmed.len(),
            ambiguous = outcome.ambiguous.len(),
            "classification complete"
        );

        let mut removed_records = 0;
        if self.options.delete_invalid_torrents {
            for seed in &outcome.confirmed {
                match self.remover.remove_keeping_data(&seed.hash).await {
                    Ok(()) => {
                        removed_records += 1;
                        let _ = self.bus.publish(Event::TorrentRemoved {
                            run_id,
                            hash: seed.hash.clone(),
                            name: seed.name.clone(),
                        });
                    }
                    Err(err) => {
                        warn!(hash = %seed.hash, error = %err, "failed to remove torrent record");
                    }
                }
            }
        }

        if self.options.notify && !outcome.confirmed.is_empty() {
            self.notifier
                .notify(&report::classification_report(
                    &outcome,
                    self.options.delete_invalid_torrents,
                ))
                .await;
        }

        let mut summary = SweepSummary {
            confirmed: outcome.confirmed.len(),
            removed_records,
            ambiguous: outcome.ambiguous.len(),
            ..SweepSummary::default()
        };

        if self.options.detect_invalid_files {
            // A fresh snapshot, so records removed above no longer claim
            // their files.
            let snapshot = self.fetch_snapshot(run_id).await?;
            let content_paths: HashSet<String> = snapshot
                .iter()
                .map(|t: &Torrent| t.content_path.clone())
                .collect();
            let reconciliation = reconcile(
                &self.options.mappings,
                &self.options.exclude_keywords,
                &content_paths,
                self.options.delete_invalid_files,
            );
            let _ = self.bus.publish(Event::FilesReconciled {
                run_id,
                orphans: reconciliation.orphans.len(),
                reclaimed_bytes: reconciliation.total_bytes,
            });
            for orphan in reconciliation.orphans.iter().filter(|o| o.removed) {
                let _ = self.bus.publish(Event::OrphanRemoved {
                    run_id,
                    path: orphan.path.to_string_lossy().to_string(),
                });
            }
            if self.options.notify && !reconciliation.orphans.is_empty() {
                self.notifier
                    .notify(&report::reconciliation_report(
                        &reconciliation,
                        self.options.delete_invalid_files,
                    ))
                    .await;
            }
            summary.orphans = reconciliation.orphans.len();
            summary.reclaimed_bytes = reconciliation.total_bytes;
        }

        let _ = self.bus.publish(Event::SweepCompleted { run_id });
        info!(%run_id, "sweep completed");
        Ok(summary)
    }

    async fn fetch_snapshot(&self, run_id: Uuid) -> SweepResult<Vec<Torrent>> {
        match self.source.fetch_all().await {
            Ok(snapshot) if snapshot.is_empty() => {
                warn!(%run_id, "torrent client returned no torrents");
                let _ = self.bus.publish(Event::SourceEmpty { run_id });
                let _ = self.bus.publish(Event::SweepFailed {
                    run_id,
                    message: "torrent source returned no torrents".to_string(),
                });
                if self.options.notify {
                    self.notifier.notify(&report::empty_source_report()).await;
                }
                Err(SweepError::EmptySource)
            }
            Ok(snapshot) => Ok(snapshot),
            Err(source) => {
                let message = source.to_string();
                warn!(%run_id, error = %message, "torrent client unreachable");
                let _ = self.bus.publish(Event::SourceUnavailable {
                    run_id,
                    message: message.clone(),
                });
                let _ = self.bus.publish(Event::SweepFailed {
                    run_id,
                    message: message.clone(),
                });
                if self.options.notify {
                    self.notifier
                        .notify(&report::source_unavailable_report(&message))
                        .await;
                }
                Err(SweepError::SourceUnavailable { source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use seedsweep_events::{Notification, NotificationCategory};
    use seedsweep_qbit::{ClientError, ClientResult, Tracker, TrackerStatus};
    use std::fs;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeSource {
        snapshot: Vec<Torrent>,
    }

    #[async_trait]
    impl TorrentSource for FakeSource {
        async fn fetch_all(&self) -> ClientResult<Vec<Torrent>> {
            Ok(self.snapshot.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl TorrentSource for DownSource {
        async fn fetch_all(&self) -> ClientResult<Vec<Torrent>> {
            Err(ClientError::HttpStatus {
                operation: "fetch_torrents",
                url: "http://qbit.lan/api/v2/torrents/info".to_string(),
                status: 502,
            })
        }
    }

    #[derive(Default)]
    struct RecordingRemover {
        removed: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl TorrentRemover for RecordingRemover {
        async fn remove_keeping_data(&self, hash: &str) -> ClientResult<()> {
            if self.fail {
                return Err(ClientError::HttpStatus {
                    operation: "remove_torrent",
                    url: "http://qbit.lan/api/v2/torrents/delete".to_string(),
                    status: 409,
                });
            }
            self.removed.lock().unwrap().push(hash.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notes: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &Notification) {
            self.notes.lock().unwrap().push(notification.clone());
        }
    }

    fn tracker(url: &str, status: TrackerStatus, msg: &str) -> Tracker {
        Tracker {
            url: url.to_string(),
            tier: 0,
            status,
            msg: msg.to_string(),
        }
    }

    fn torrent(hash: &str, name: &str, content_path: &str, trackers: Vec<Tracker>) -> Torrent {
        Torrent {
            hash: hash.to_string(),
            name: name.to_string(),
            size: 2048,
            content_path: content_path.to_string(),
            trackers,
        }
    }

    fn dead_and_alive_snapshot() -> Vec<Torrent> {
        vec![
            torrent(
                "dead",
                "Dead.Release",
                "/downloads/Dead.Release",
                vec![tracker(
                    "https://tracker.example/announce",
                    TrackerStatus::NotWorking,
                    "unregistered",
                )],
            ),
            torrent(
                "alive",
                "Alive.Release",
                "/downloads/Alive.Release",
                vec![tracker(
                    "https://tracker.example/announce",
                    TrackerStatus::Working,
                    "",
                )],
            ),
        ]
    }

    fn service(
        source: Arc<dyn TorrentSource>,
        remover: Arc<RecordingRemover>,
        notifier: Arc<RecordingNotifier>,
        options: SweepOptions,
    ) -> SweepService {
        SweepService::new(source, remover, notifier, EventBus::new(), options)
    }

    #[tokio::test]
    async fn confirmed_seeds_are_removed_and_reported() -> Result<()> {
        let remover = Arc::new(RecordingRemover::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(
            Arc::new(FakeSource {
                snapshot: dead_and_alive_snapshot(),
            }),
            Arc::clone(&remover),
            Arc::clone(&notifier),
            SweepOptions {
                notify: true,
                delete_invalid_torrents: true,
                ..SweepOptions::default()
            },
        );

        let summary = svc.run_sweep().await?;
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.removed_records, 1);
        assert_eq!(summary.ambiguous, 0);
        assert_eq!(*remover.removed.lock().unwrap(), vec!["dead".to_string()]);

        let notes = notifier.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, NotificationCategory::Classification);
        assert!(notes[0].body.contains("Dead.Release"));
        Ok(())
    }

    #[tokio::test]
    async fn clean_run_sends_no_notification() -> Result<()> {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(
            Arc::new(FakeSource {
                snapshot: vec![torrent(
                    "alive",
                    "Alive.Release",
                    "/downloads/Alive.Release",
                    vec![tracker(
                        "https://tracker.example/announce",
                        TrackerStatus::Working,
                        "",
                    )],
                )],
            }),
            Arc::new(RecordingRemover::default()),
            Arc::clone(&notifier),
            SweepOptions {
                notify: true,
                delete_invalid_torrents: true,
                ..SweepOptions::default()
            },
        );

        let summary = svc.run_sweep().await?;
        assert_eq!(summary.confirmed, 0);
        assert!(notifier.notes.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn empty_source_aborts_with_its_own_notification() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(
            Arc::new(FakeSource { snapshot: vec![] }),
            Arc::new(RecordingRemover::default()),
            Arc::clone(&notifier),
            SweepOptions {
                notify: true,
                ..SweepOptions::default()
            },
        );

        let err = svc.run_sweep().await.expect_err("empty snapshot must abort");
        assert!(matches!(err, SweepError::EmptySource));
        let notes = notifier.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, NotificationCategory::SourceError);
        assert!(notes[0].title.contains("empty"));
    }

    #[tokio::test]
    async fn unreachable_source_aborts_with_its_own_notification() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(
            Arc::new(DownSource),
            Arc::new(RecordingRemover::default()),
            Arc::clone(&notifier),
            SweepOptions {
                notify: true,
                ..SweepOptions::default()
            },
        );

        let err = svc.run_sweep().await.expect_err("down client must abort");
        assert!(matches!(err, SweepError::SourceUnavailable { .. }));
        let notes = notifier.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].title.contains("unreachable"));
    }

    #[tokio::test]
    async fn removal_failures_do_not_abort_the_run() -> Result<()> {
        let remover = Arc::new(RecordingRemover {
            fail: true,
            ..RecordingRemover::default()
        });
        let svc = service(
            Arc::new(FakeSource {
                snapshot: dead_and_alive_snapshot(),
            }),
            Arc::clone(&remover),
            Arc::new(RecordingNotifier::default()),
            SweepOptions {
                delete_invalid_torrents: true,
                ..SweepOptions::default()
            },
        );

        let summary = svc.run_sweep().await?;
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.removed_records, 0);
        Ok(())
    }

    #[tokio::test]
    async fn reconciliation_reports_orphaned_entries() -> Result<()> {
        let root = TempDir::new()?;
        let mut file = fs::File::create(root.path().join("Orphan.Release"))?;
        file.write_all(&[0u8; 64])?;
        fs::create_dir(root.path().join("Alive.Release"))?;

        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(
            Arc::new(FakeSource {
                snapshot: vec![torrent(
                    "alive",
                    "Alive.Release",
                    "/downloads/Alive.Release",
                    vec![tracker(
                        "https://tracker.example/announce",
                        TrackerStatus::Working,
                        "",
                    )],
                )],
            }),
            Arc::new(RecordingRemover::default()),
            Arc::clone(&notifier),
            SweepOptions {
                notify: true,
                detect_invalid_files: true,
                mappings: vec![DirectoryMapping {
                    local_root: root.path().to_string_lossy().to_string(),
                    client_root: "/downloads".to_string(),
                }],
                ..SweepOptions::default()
            },
        );

        let summary = svc.run_sweep().await?;
        assert_eq!(summary.orphans, 1);
        assert_eq!(summary.reclaimed_bytes, 64);
        assert!(root.path().join("Orphan.Release").exists());

        let notes = notifier.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, NotificationCategory::Reconciliation);
        assert!(notes[0].body.contains("Orphan.Release"));
        Ok(())
    }

    #[tokio::test]
    async fn events_cover_the_whole_run() -> Result<()> {
        let bus = EventBus::new();
        let mut stream = bus.subscribe();
        let svc = SweepService::new(
            Arc::new(FakeSource {
                snapshot: dead_and_alive_snapshot(),
            }),
            Arc::new(RecordingRemover::default()),
            Arc::new(RecordingNotifier::default()),
            bus,
            SweepOptions {
                delete_invalid_torrents: true,
                ..SweepOptions::default()
            },
        );

        svc.run_sweep().await?;

        let mut kinds = Vec::new();
        for _ in 0..5 {
            let envelope = stream.next().await.expect("event");
            kinds.push(envelope.event.kind());
        }
        assert_eq!(
            kinds,
            vec![
                "sweep_started",
                "snapshot_fetched",
                "seeds_classified",
                "torrent_removed",
                "sweep_completed",
            ]
        );
        Ok(())
    }
}
