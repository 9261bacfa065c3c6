use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the status sync service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub sync: SyncConfig,

    #[serde(default = "default_footer_text")]
    pub footer_text: String,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    #[serde(default = "default_discord_api_url")]
    pub discord_api_url: String,

    #[serde(default = "default_discord_gateway_url")]
    pub discord_gateway_url: String,
}

/// Settings consumed by the reconciliation loop. Fixed from mount to unmount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_update_interval_ms", alias = "updateInterval")]
    pub update_interval_ms: u64,

    #[serde(default, alias = "disableStatus")]
    pub disable_status: bool,

    #[serde(default, alias = "messageIDs")]
    pub targets: Vec<TargetRef>,
}

/// One remote message kept in sync with the server state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    #[serde(rename = "channelID", alias = "channel_id")]
    pub channel_id: String,
    #[serde(rename = "messageID", alias = "message_id")]
    pub message_id: String,
}

impl TargetRef {
    pub fn new(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            footer_text: default_footer_text(),
            snapshot_path: default_snapshot_path(),
            discord_api_url: default_discord_api_url(),
            discord_gateway_url: default_discord_gateway_url(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            disable_status: false,
            targets: Vec::new(),
        }
    }
}

impl SyncConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

fn default_update_interval_ms() -> u64 {
    60 * 1000
}

fn default_footer_text() -> String {
    "Squad server status".to_string()
}

fn default_snapshot_path() -> String {
    "server-status.json".to_string()
}

fn default_discord_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_discord_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}
