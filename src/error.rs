//! Error types shared across the assistant core.

use std::time::Duration;
use thiserror::Error;

/// Configuration load/validation errors.
///
/// Recovered locally where possible: a missing or unparsable config file
/// falls back to defaults which are persisted back to disk. Only a config
/// that cannot even be defaulted is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single data-source fetch failed.
///
/// Isolated per slot: one failing source never blocks the others and never
/// discards previously cached data for its slot. Carries enough detail for
/// logging; never surfaced raw to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("source returned error code {code}: {message}")]
    Api { code: i64, message: String },

    #[error("unexpected payload: {0}")]
    Payload(String),
}

/// Cache persistence failed.
///
/// The in-memory cache stays usable; persistence is retried on the next
/// sync pass.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
