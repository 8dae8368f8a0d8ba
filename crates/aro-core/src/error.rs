//! Error types for power-data ring access.
//!
//! Every failure a record source can produce is surfaced as a distinct
//! [`PowerDataError`] variant. None of them poison the source handle: each
//! call is independent, so a caller that hits [`PowerDataError::DataGone`]
//! can re-query the window and retry with a newer start.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for power-data operations.
pub type Result<T> = std::result::Result<T, PowerDataError>;

/// Errors that can occur when reading records from a power-data source.
#[derive(Error, Debug)]
pub enum PowerDataError {
    /// Backing store header unreadable or ring geometry inconsistent.
    ///
    /// Fatal at open. Not retryable without producer intervention.
    #[error("Malformed ring file '{}': {message}", path.display())]
    MalformedHeader { path: PathBuf, message: String },

    /// Requested history has already been overwritten by the producer.
    #[error(
        "Data gone: record {requested} precedes first available record {first_available}"
    )]
    DataGone { requested: i64, first_available: i64 },

    /// Requested range is empty after clamping to the current window.
    #[error("Invalid record range [{start}, {end}): nothing to read")]
    InvalidRange { start: i64, end: i64 },

    /// Acquisition or source parameters are unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// I/O error from the operating system while touching the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PowerDataError {
    /// Build a [`PowerDataError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Build a [`PowerDataError::MalformedHeader`] for the given backing file.
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if the requested history was overwritten.
    pub fn is_data_gone(&self) -> bool {
        matches!(self, Self::DataGone { .. })
    }

    /// Check if the caller can recover by adjusting its request.
    ///
    /// `DataGone` is fixed by re-querying the window and advancing the start;
    /// `InvalidRange` by asking for a non-empty range.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DataGone { .. } | Self::InvalidRange { .. })
    }
}
