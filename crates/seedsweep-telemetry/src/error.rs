//! # Design
//!
//! - Constant-message errors for telemetry setup.
//! - Preserve source errors instead of interpolating them into messages.

use thiserror::Error;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors produced while configuring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The global tracing subscriber could not be installed.
    #[error("failed to install tracing subscriber")]
    Subscriber {
        /// Underlying initialisation error.
        source: tracing_subscriber::util::TryInitError,
    },
}
