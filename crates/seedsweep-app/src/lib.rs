//! Application shell: CLI parsing, settings loading, telemetry, scheduling.
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

mod bootstrap;
mod cli;
mod error;
mod scheduler;

use clap::Parser;

pub use error::{AppError, AppResult};

/// Parse the CLI, load settings, and run the job to completion.
///
/// # Errors
///
/// Returns an error for unusable settings or startup failures; individual
/// sweep failures are logged and notified, not fatal.
pub async fn run() -> AppResult<()> {
    let cli = cli::Cli::parse();
    let settings = seedsweep_config::load_settings(&cli.config)?;
    bootstrap::init_telemetry(&settings)?;
    bootstrap::run_app(&settings, cli.once).await
}
