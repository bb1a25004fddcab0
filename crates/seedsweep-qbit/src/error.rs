//! # Design
//!
//! - Constant-message errors with structured context fields.
//! - Transport failures carry the operation and URL so a failed sweep log
//!   points at the exact call.

use thiserror::Error;

/// Result type for torrent client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by the qBittorrent Web API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or the response not read.
    #[error("client transport failure")]
    Http {
        /// Operation that issued the request.
        operation: &'static str,
        /// Request URL.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The API answered with a non-success status code.
    #[error("client rejected request")]
    HttpStatus {
        /// Operation that issued the request.
        operation: &'static str,
        /// Request URL.
        url: String,
        /// HTTP status returned by the API.
        status: u16,
    },
    /// Login was refused by the API.
    #[error("client authentication failed")]
    Unauthorized {
        /// Login endpoint URL.
        url: String,
    },
    /// A response body could not be decoded.
    #[error("client response decode failure")]
    Decode {
        /// Operation that issued the request.
        operation: &'static str,
        /// Request URL.
        url: String,
        /// Underlying decode error.
        source: reqwest::Error,
    },
    /// The configured base URL is not usable.
    #[error("client base url invalid")]
    BaseUrl {
        /// The offending value.
        value: String,
    },
}
