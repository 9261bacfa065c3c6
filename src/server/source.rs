use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::types::StatusError;

use super::snapshot::{ServerSnapshot, SnapshotFile};

/// Read-only access to the latest server state, maintained elsewhere.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn snapshot(&self) -> Result<ServerSnapshot, StatusError>;
}

/// In-process snapshot updated by whoever owns the telemetry.
#[derive(Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<ServerSnapshot>>,
}

impl SharedSnapshot {
    pub fn new(initial: ServerSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replaces the current snapshot wholesale.
    pub async fn publish(&self, snapshot: ServerSnapshot) {
        *self.inner.write().await = snapshot;
    }
}

#[async_trait]
impl SnapshotSource for SharedSnapshot {
    async fn snapshot(&self) -> Result<ServerSnapshot, StatusError> {
        Ok(self.inner.read().await.clone())
    }
}

/// Reads a JSON status file on every call.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn snapshot(&self) -> Result<ServerSnapshot, StatusError> {
        let contents = fs::read_to_string(&self.path).await.map_err(|err| {
            StatusError::SnapshotUnavailable(format!("{}: {err}", self.path.display()))
        })?;
        let raw: SnapshotFile = serde_json::from_str(&contents)?;
        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::NextLayer;
    use std::io::Write;

    #[tokio::test]
    async fn test_shared_snapshot_returns_latest_publish() {
        let shared = SharedSnapshot::default();
        assert_eq!(shared.snapshot().await.unwrap(), ServerSnapshot::default());

        let next = ServerSnapshot {
            server_name: "Updated".to_string(),
            current_players: 7,
            ..Default::default()
        };
        shared.publish(next.clone()).await;
        assert_eq!(shared.snapshot().await.unwrap(), next);
    }

    #[tokio::test]
    async fn test_file_source_parses_status_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"serverName":"S","currentPlayers":10,"publicSlots":80,"nextLayerName":"Yehorivka_RAAS_v3"}}"#
        )
        .unwrap();

        let source = FileSnapshotSource::new(file.path());
        let snapshot = source.snapshot().await.unwrap();
        assert_eq!(snapshot.current_players, 10);
        assert_eq!(
            snapshot.next_layer,
            NextLayer::Known("Yehorivka_RAAS_v3".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSnapshotSource::new(dir.path().join("missing.json"));
        let err = source.snapshot().await.unwrap_err();
        assert!(matches!(err, StatusError::SnapshotUnavailable(_)));
    }
}
