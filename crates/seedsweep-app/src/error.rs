//! # Design
//!
//! - Startup failures are fatal and carry enough context to fix the
//!   configuration without a debugger.

use seedsweep_config::ConfigError;
use seedsweep_qbit::ClientError;
use seedsweep_telemetry::TelemetryError;
use thiserror::Error;

/// Result type for application startup and scheduling.
pub type AppResult<T> = Result<T, AppError>;

/// Fatal application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings could not be loaded or validated.
    #[error("settings load failure")]
    Config {
        /// Underlying configuration error.
        #[from]
        source: ConfigError,
    },
    /// The tracing subscriber could not be installed.
    #[error("telemetry init failure")]
    Telemetry {
        /// Underlying telemetry error.
        #[from]
        source: TelemetryError,
    },
    /// The torrent client could not be constructed.
    #[error("torrent client construction failure")]
    Client {
        /// Underlying client error.
        #[from]
        source: ClientError,
    },
    /// The configured cron expression does not parse.
    #[error("invalid cron expression")]
    Schedule {
        /// The offending expression.
        expression: String,
        /// Underlying parse error.
        source: cron::error::Error,
    },
    /// The configured webhook URL does not parse.
    #[error("invalid webhook url")]
    WebhookUrl {
        /// The offending value.
        value: String,
    },
}
