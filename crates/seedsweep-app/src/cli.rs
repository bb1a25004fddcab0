//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Dead-seed cleaner and download-directory reconciler for qBittorrent.
#[derive(Debug, Parser)]
#[command(name = "seedsweep", version, about)]
pub(crate) struct Cli {
    /// Path to the TOML settings file.
    #[arg(
        long,
        short = 'c',
        env = "SEEDSWEEP_CONFIG",
        default_value = "seedsweep.toml"
    )]
    pub(crate) config: PathBuf,

    /// Run a single sweep immediately and exit, ignoring the schedule.
    #[arg(long)]
    pub(crate) once: bool,
}
