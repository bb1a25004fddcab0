//! Fail-fast validation of operator-supplied settings.

use crate::error::{ConfigError, ConfigResult};
use crate::model::{DirectoryMapping, Settings};

/// Parse `local:client` mapping lines into typed mappings.
///
/// Blank lines are ignored. A line without the `:` separator, or with an
/// empty side, aborts with an error naming the offending line so a typo is
/// caught at startup rather than mid-sweep.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` for the first malformed line.
pub fn parse_mappings(lines: &[String]) -> ConfigResult<Vec<DirectoryMapping>> {
    let mut mappings = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((local, client)) = line.split_once(':') else {
            return Err(ConfigError::invalid(
                "directories",
                "mappings",
                Some(line.to_string()),
                "missing ':' separator between local and client roots",
            ));
        };
        let (local, client) = (local.trim(), client.trim());
        if local.is_empty() || client.is_empty() {
            return Err(ConfigError::invalid(
                "directories",
                "mappings",
                Some(line.to_string()),
                "both local and client roots must be non-empty",
            ));
        }
        mappings.push(DirectoryMapping {
            local_root: local.to_string(),
            client_root: client.to_string(),
        });
    }
    Ok(mappings)
}

/// Validate a loaded settings document before the job starts.
pub(crate) fn check(settings: &Settings) -> ConfigResult<()> {
    if settings.client.base_url.trim().is_empty() {
        return Err(ConfigError::invalid(
            "client",
            "base_url",
            None,
            "base_url must not be empty",
        ));
    }
    if settings.job.enabled && !settings.job.run_once && settings.job.cron.trim().is_empty() {
        return Err(ConfigError::invalid(
            "job",
            "cron",
            None,
            "a recurring job requires a cron expression",
        ));
    }
    if settings.job.delete_invalid_files && !settings.job.detect_invalid_files {
        return Err(ConfigError::invalid(
            "job",
            "delete_invalid_files",
            None,
            "file deletion requires detect_invalid_files",
        ));
    }
    settings.mappings().map(|_| ())
}
