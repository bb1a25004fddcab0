//! Sweep pipeline: invalid-seed classification, torrent record remediation,
//! and filesystem reconciliation.
//!
//! The pipeline never deletes payload data through the torrent client, and it
//! never touches a torrent whose invalidity could not be confirmed against a
//! tracker that is demonstrably alive elsewhere in the snapshot.
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

mod classifier;
mod error;
mod reconciler;
mod report;
mod service;

pub use classifier::{Classification, ConfirmedInvalid, SeedRef, classify, normalize_domain};
pub use error::{SweepError, SweepResult};
pub use reconciler::{OrphanEntry, Reconciliation, reconcile};
pub use report::{classification_report, format_size, reconciliation_report};
pub use service::{SweepOptions, SweepService, SweepSummary};
