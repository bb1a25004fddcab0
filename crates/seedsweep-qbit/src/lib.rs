//! qBittorrent Web API access for seedsweep.
//!
//! Exposes a snapshot-oriented view of the client: the whole torrent list with
//! per-torrent tracker state, plus record-only removal. Capability traits keep
//! the sweep logic testable without a live client.
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

mod client;
mod error;
mod model;
mod traits;

pub use client::QbitClient;
pub use error::{ClientError, ClientResult};
pub use model::{DISABLED_TIER, Torrent, Tracker, TrackerStatus};
pub use traits::{TorrentRemover, TorrentSource};
