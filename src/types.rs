use thiserror::Error;

use crate::config::TargetRef;

/// Application-level errors: configuration, startup and snapshot access.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
    #[error("Status sync is already mounted")]
    AlreadyMounted,
    #[error("No tokio runtime available to spawn background tasks")]
    NoRuntime,
    #[error("Server snapshot unavailable: {0}")]
    SnapshotUnavailable(String),
}

/// Errors reported by a chat platform adapter.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{path} returned {status}")]
    Api { path: String, status: u16 },
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl PlatformError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PlatformError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound { .. })
    }
}

/// Failures a single tick can run into. None of them escape the tick.
#[derive(Debug, Error)]
pub enum SyncFailure {
    #[error("Failed to read server snapshot: {0}")]
    SnapshotUnavailable(#[source] StatusError),
    #[error("Failed to resolve message {} in channel {}: {source}", .target.message_id, .target.channel_id)]
    TargetResolution {
        target: TargetRef,
        #[source]
        source: PlatformError,
    },
    #[error("Failed to edit message {} in channel {}: {source}", .target.message_id, .target.channel_id)]
    TargetUpdate {
        target: TargetRef,
        #[source]
        source: PlatformError,
    },
    #[error("Failed to update presence: {0}")]
    PresenceUpdate(#[source] PlatformError),
}
