//! Settings value objects.
//!
//! `Settings` is an immutable snapshot of the operator's intent for a sweep
//! run. It is deserialized once at startup and shared by reference; nothing
//! mutates it afterwards.

use serde::Deserialize;

use crate::error::ConfigResult;
use crate::validate;

/// Root settings document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct Settings {
    /// Job-level flags and schedule.
    pub job: JobSettings,
    /// Torrent client endpoint and credentials.
    pub client: ClientSettings,
    /// Directory mappings and exclusions for reconciliation.
    pub directories: DirectorySettings,
    /// Optional notification sink.
    pub notifier: NotifierSettings,
    /// Logging verbosity and format.
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parse the configured mapping lines into typed mappings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidField` naming the first malformed line.
    pub fn mappings(&self) -> ConfigResult<Vec<DirectoryMapping>> {
        validate::parse_mappings(&self.directories.mappings)
    }
}

/// Flags governing what a sweep run does.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct JobSettings {
    /// Master switch; a disabled job never schedules sweeps.
    pub enabled: bool,
    /// Cron expression controlling recurring sweeps.
    pub cron: String,
    /// Run a single sweep at startup, then exit.
    pub run_once: bool,
    /// Send run summaries to the notification sink.
    pub notify: bool,
    /// Delete confirmed-invalid torrent records from the client.
    pub delete_invalid_torrents: bool,
    /// Look for orphaned download files on disk.
    pub detect_invalid_files: bool,
    /// Delete orphaned download files found by detection.
    pub delete_invalid_files: bool,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            cron: "0 0 3 * * *".to_string(),
            run_once: false,
            notify: true,
            delete_invalid_torrents: false,
            detect_invalid_files: false,
            delete_invalid_files: false,
        }
    }
}

/// Torrent client connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ClientSettings {
    /// Base URL of the qBittorrent Web API.
    pub base_url: String,
    /// Web API username.
    pub username: String,
    /// Web API password.
    pub password: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Directory reconciliation settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct DirectorySettings {
    /// Mapping lines in `local:client` form, one root pair per line.
    pub mappings: Vec<String>,
    /// Entries whose names contain any of these keywords are never touched.
    pub exclude_keywords: Vec<String>,
}

/// Notification sink settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct NotifierSettings {
    /// Webhook endpoint; when absent, summaries go to the log only.
    pub webhook_url: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingSettings {
    /// Log level filter, e.g. `info` or `seedsweep_core=debug`.
    pub level: String,
    /// Output format label: `json` or `pretty`. Empty means auto-detect.
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: String::new(),
        }
    }
}

/// A validated pair of local and client-side root directories.
///
/// Reconciliation lists entries under `local_root` and translates each path
/// into the client's view by swapping the prefix for `client_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryMapping {
    /// Root directory as seen by this process.
    pub local_root: String,
    /// The same directory as seen by the torrent client.
    pub client_root: String,
}
