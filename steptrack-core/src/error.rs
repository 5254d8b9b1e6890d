//! Error types for track recording and configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the tracker, the thread-local facade and config loading.
///
/// Failures raised by a finalize callback are not represented here: they
/// travel through the callback's own return type.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Track could not be opened as requested (missing callback, bad keys)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No active session for this track name in the current context
    #[error("Track '{track}' is not initialized")]
    NotInitialized { track: String },

    /// Thread-local `done` was asked for a type the callback does not return
    #[error("Track '{track}' callback did not return a value of type {expected}")]
    ResultType {
        track: String,
        expected: &'static str,
    },

    /// Failed to read a configuration file
    #[error("Failed to read track configuration from {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration document
    #[error("Failed to parse track configuration")]
    ConfigParse {
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrackError {
    pub(crate) fn not_initialized(track: &str) -> Self {
        TrackError::NotInitialized {
            track: track.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
