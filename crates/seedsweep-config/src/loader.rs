//! Settings loading.
//!
//! Settings come from a TOML file, with a small set of environment overrides
//! so credentials can stay out of the file:
//!
//! - `SEEDSWEEP_CLIENT_URL` overrides `client.base_url`
//! - `SEEDSWEEP_CLIENT_USERNAME` overrides `client.username`
//! - `SEEDSWEEP_CLIENT_PASSWORD` overrides `client.password`

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Settings;
use crate::validate;

/// Load, override, and validate settings from the given TOML file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not valid TOML, or
/// fails validation (for example a malformed directory mapping line).
pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::io("read_settings", path, source))?;
    let mut settings: Settings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    apply_env_overrides(&mut settings);
    validate::check(&settings)?;
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(url) = std::env::var("SEEDSWEEP_CLIENT_URL") {
        settings.client.base_url = url;
    }
    if let Ok(username) = std::env::var("SEEDSWEEP_CLIENT_USERNAME") {
        settings.client.username = username;
    }
    if let Ok(password) = std::env::var("SEEDSWEEP_CLIENT_PASSWORD") {
        settings.client.password = password;
    }
}
