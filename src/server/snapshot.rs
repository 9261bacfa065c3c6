use serde::{Deserialize, Serialize};

/// What is known about the layer that follows the current one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NextLayer {
    Known(String),
    PendingVote,
    #[default]
    Unknown,
}

impl NextLayer {
    /// Builds the variant from the raw telemetry pair. A name wins over a pending vote.
    pub fn from_raw(name: Option<&str>, vote_pending: bool) -> Self {
        match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => NextLayer::Known(name.to_string()),
            None if vote_pending => NextLayer::PendingVote,
            None => NextLayer::Unknown,
        }
    }
}

/// Point-in-time view of the monitored server. Read-only for the sync loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerSnapshot {
    pub server_name: String,
    pub current_players: u32,
    pub public_slots: u32,
    pub reserve_slots: u32,
    pub public_queue: u32,
    pub reserve_queue: u32,
    pub current_layer: Option<String>,
    pub next_layer: NextLayer,
}

impl ServerSnapshot {
    pub fn queue_size(&self) -> u32 {
        self.public_queue.saturating_add(self.reserve_queue)
    }

    pub fn total_slots(&self) -> u32 {
        self.public_slots.saturating_add(self.reserve_slots)
    }

    /// Players over public plus reserve slots, clamped to [0, 1]. Queued players are not counted.
    pub fn occupancy_ratio(&self) -> f64 {
        let total = self.total_slots();
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.current_players) / f64::from(total)).clamp(0.0, 1.0)
    }

    pub fn current_layer_name(&self) -> Option<&str> {
        self.current_layer
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Status file layout written by the server-side telemetry collector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    #[serde(default)]
    pub server_name: String,
    #[serde(default, alias = "a2sPlayerCount")]
    pub current_players: u32,
    #[serde(default)]
    pub public_slots: u32,
    #[serde(default)]
    pub reserve_slots: u32,
    #[serde(default)]
    pub public_queue: u32,
    #[serde(default)]
    pub reserve_queue: u32,
    #[serde(default)]
    pub current_layer_name: Option<String>,
    #[serde(default)]
    pub next_layer_name: Option<String>,
    #[serde(default, alias = "nextLayerToBeVoted")]
    pub next_layer_pending: bool,
}

impl From<SnapshotFile> for ServerSnapshot {
    fn from(raw: SnapshotFile) -> Self {
        let next_layer = NextLayer::from_raw(raw.next_layer_name.as_deref(), raw.next_layer_pending);
        Self {
            server_name: raw.server_name,
            current_players: raw.current_players,
            public_slots: raw.public_slots,
            reserve_slots: raw.reserve_slots,
            public_queue: raw.public_queue,
            reserve_queue: raw.reserve_queue,
            current_layer: raw.current_layer_name,
            next_layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_layer_name_wins_over_pending_vote() {
        assert_eq!(
            NextLayer::from_raw(Some("Gorodok_AAS_v2"), true),
            NextLayer::Known("Gorodok_AAS_v2".to_string())
        );
        assert_eq!(NextLayer::from_raw(None, true), NextLayer::PendingVote);
        assert_eq!(NextLayer::from_raw(Some("  "), true), NextLayer::PendingVote);
        assert_eq!(NextLayer::from_raw(None, false), NextLayer::Unknown);
        assert_eq!(NextLayer::from_raw(Some(""), false), NextLayer::Unknown);
    }

    #[test]
    fn test_occupancy_ratio_uses_public_and_reserve_slots() {
        let snapshot = ServerSnapshot {
            current_players: 50,
            public_slots: 50,
            reserve_slots: 10,
            public_queue: 3,
            ..Default::default()
        };
        assert!((snapshot.occupancy_ratio() - 50.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_occupancy_ratio_without_slots_is_zero() {
        let snapshot = ServerSnapshot {
            current_players: 12,
            ..Default::default()
        };
        assert_eq!(snapshot.occupancy_ratio(), 0.0);
    }

    #[test]
    fn test_occupancy_ratio_is_clamped() {
        let snapshot = ServerSnapshot {
            current_players: 120,
            public_slots: 80,
            reserve_slots: 0,
            ..Default::default()
        };
        assert_eq!(snapshot.occupancy_ratio(), 1.0);
    }

    #[test]
    fn test_snapshot_file_accepts_legacy_names() {
        let raw = r#"{
            "serverName": "Test Server",
            "a2sPlayerCount": 42,
            "publicSlots": 80,
            "reserveSlots": 20,
            "currentLayerName": "Narva_RAAS_v1",
            "nextLayerToBeVoted": true
        }"#;
        let file: SnapshotFile = serde_json::from_str(raw).unwrap();
        let snapshot = ServerSnapshot::from(file);

        assert_eq!(snapshot.server_name, "Test Server");
        assert_eq!(snapshot.current_players, 42);
        assert_eq!(snapshot.total_slots(), 100);
        assert_eq!(snapshot.current_layer_name(), Some("Narva_RAAS_v1"));
        assert_eq!(snapshot.next_layer, NextLayer::PendingVote);
    }
}
