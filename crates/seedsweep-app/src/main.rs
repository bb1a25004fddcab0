//! Binary entry point for the seedsweep job.
#![forbid(unsafe_code)]
#![deny(warnings, clippy::all, clippy::pedantic, missing_docs)]
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match seedsweep_app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("seedsweep: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
