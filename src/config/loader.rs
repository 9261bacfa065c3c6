use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::StatusError;

use super::{paths, Config};

impl Config {
    /// Load configuration from config.json
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let config_path = paths::get_config_path();
        match Self::load_from(&config_path).await {
            Ok(config) => {
                info!(
                    path = %config_path.display(),
                    interval_ms = config.sync.update_interval_ms,
                    targets = config.sync.targets.len(),
                    disable_status = config.sync.disable_status,
                    "Loaded configuration"
                );
                config
            }
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        }
    }

    /// Read and validate a config file. A missing file yields the defaults.
    pub async fn load_from(config_path: &Path) -> Result<Self, StatusError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| StatusError::Config(format!("Failed to read config file: {err}")))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|err| StatusError::Config(format!("Failed to parse config.json: {err}")))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StatusError> {
        if self.sync.update_interval_ms == 0 {
            return Err(StatusError::Config(
                "updateInterval must be greater than zero".to_string(),
            ));
        }

        let gateway = self.discord_gateway_url.as_str();
        if !self.sync.disable_status && !(gateway.starts_with("ws://") || gateway.starts_with("wss://")) {
            return Err(StatusError::Config(format!(
                "discord_gateway_url must be a ws:// or wss:// URL when presence is enabled, got {gateway:?}"
            )));
        }

        for target in &self.sync.targets {
            if target.channel_id.trim().is_empty() || target.message_id.trim().is_empty() {
                return Err(StatusError::Config(format!(
                    "Target entries need both channelID and messageID, got {:?}",
                    target
                )));
            }
        }

        Ok(())
    }
}
