//! Typed settings for the seedsweep maintenance job.
//!
//! Layout: `model.rs` (value objects), `loader.rs` (TOML file + env
//! overrides), `validate.rs` (fail-fast checks), `error.rs` (error types).
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

mod error;
mod loader;
mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_settings;
pub use model::{
    ClientSettings, DirectoryMapping, DirectorySettings, JobSettings, LoggingSettings,
    NotifierSettings, Settings,
};
pub use validate::parse_mappings;
