//! Error types for playlist-dl
//!
//! This module provides the error taxonomy for the library:
//! - Run-fatal error kinds (`InvalidReference`, `CollectionFailed`) that abort
//!   a run before or during metadata collection
//! - Ambient error kinds (config, I/O, network, serialization)
//!
//! Per-track recoverable failures are deliberately not represented here: a
//! failed track is converted into a
//! [`DownloadOutcome`](crate::types::DownloadOutcome) at the track boundary
//! and never unwinds past the orchestrator.

use thiserror::Error;

/// Result type alias for playlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-dl
///
/// Only `InvalidReference` and `CollectionFailed` are run-fatal. Everything a
/// single track can hit is recorded as an outcome instead of propagating.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "output_dir")
        key: Option<String>,
    },

    /// Playlist reference string matched none of the recognized shapes
    #[error("invalid playlist reference: {0}")]
    InvalidReference(String),

    /// Whole-playlist metadata collection failed (no partial lists)
    #[error("playlist collection failed: {0}")]
    CollectionFailed(String),

    /// Playlist source returned a malformed or unexpected response
    #[error("playlist source error: {0}")]
    Source(String),

    /// Media provider failed at the provider level (search or download)
    #[error("media provider error: {0}")]
    Provider(String),

    /// External tool execution failed (downloader binary, transcoder)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary, not implemented)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Run was interrupted by a termination signal
    #[error("run interrupted")]
    Interrupted,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Construct a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::InvalidReference("not-a-url".to_string());
        assert_eq!(err.to_string(), "invalid playlist reference: not-a-url");

        let err = Error::CollectionFailed("page fetch timed out".to_string());
        assert_eq!(
            err.to_string(),
            "playlist collection failed: page fetch timed out"
        );
    }

    #[test]
    fn test_config_error_constructor() {
        let err = Error::config("output_dir", "must not be empty");
        match err {
            Error::Config { message, key } => {
                assert_eq!(message, "must not be empty");
                assert_eq!(key.as_deref(), Some("output_dir"));
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
