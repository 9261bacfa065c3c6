use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use squad_status_sync::server::SharedSnapshot;
use squad_status_sync::status::PENDING_VOTE;
use squad_status_sync::{
    ActivityKind, ChannelHandle, MessageHandle, NextLayer, Platform, PlatformError, Reconciler,
    RenderedPayload, ServerSnapshot, StatusSync, SyncConfig, SyncFailure, TargetRef,
};

/// Single-channel platform that keeps the latest payload per message.
#[derive(Default)]
struct MemoryPlatform {
    channel_id: String,
    messages: Mutex<HashMap<String, Option<RenderedPayload>>>,
    presence: Mutex<Vec<(String, ActivityKind)>>,
}

impl MemoryPlatform {
    fn with_messages(channel_id: &str, message_ids: &[&str]) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            messages: Mutex::new(
                message_ids
                    .iter()
                    .map(|id| (id.to_string(), None))
                    .collect(),
            ),
            presence: Mutex::default(),
        }
    }

    fn content(&self, message_id: &str) -> Option<RenderedPayload> {
        self.messages
            .lock()
            .unwrap()
            .get(message_id)
            .cloned()
            .flatten()
    }
}

#[async_trait]
impl Platform for MemoryPlatform {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelHandle, PlatformError> {
        if channel_id == self.channel_id {
            Ok(ChannelHandle {
                id: channel_id.to_string(),
                name: Some("server-status".to_string()),
            })
        } else {
            Err(PlatformError::not_found("channel", channel_id))
        }
    }

    async fn fetch_message(
        &self,
        channel: &ChannelHandle,
        message_id: &str,
    ) -> Result<MessageHandle, PlatformError> {
        if self.messages.lock().unwrap().contains_key(message_id) {
            Ok(MessageHandle {
                channel_id: channel.id.clone(),
                id: message_id.to_string(),
            })
        } else {
            Err(PlatformError::not_found("message", message_id))
        }
    }

    async fn edit_message(
        &self,
        message: &MessageHandle,
        payload: &RenderedPayload,
    ) -> Result<(), PlatformError> {
        self.messages
            .lock()
            .unwrap()
            .insert(message.id.clone(), Some(payload.clone()));
        Ok(())
    }

    async fn set_presence(&self, text: &str, kind: ActivityKind) -> Result<(), PlatformError> {
        self.presence.lock().unwrap().push((text.to_string(), kind));
        Ok(())
    }
}

fn narva() -> ServerSnapshot {
    ServerSnapshot {
        server_name: "Squad Test Server".to_string(),
        current_players: 50,
        public_slots: 50,
        reserve_slots: 10,
        public_queue: 3,
        reserve_queue: 0,
        current_layer: Some("Narva_RAAS_v1".to_string()),
        next_layer: NextLayer::PendingVote,
    }
}

#[tokio::test]
async fn test_tick_updates_valid_target_despite_missing_message() {
    let platform = Arc::new(MemoryPlatform::with_messages("status", &["live"]));
    let config = SyncConfig {
        targets: vec![
            TargetRef::new("status", "deleted"),
            TargetRef::new("status", "live"),
        ],
        ..Default::default()
    };
    let reconciler = Reconciler::new(
        config,
        "footer",
        platform.clone(),
        Arc::new(SharedSnapshot::new(narva())),
    );

    let report = reconciler.tick().await;

    match &report.targets[0].result {
        Err(SyncFailure::TargetResolution { target, source }) => {
            assert_eq!(target.message_id, "deleted");
            assert!(source.is_not_found());
        }
        other => panic!("expected a resolution failure, got {other:?}"),
    }
    assert!(report.targets[1].result.is_ok());

    let content = platform.content("live").unwrap();
    assert_eq!(content.title, "Squad Test Server");
    assert_eq!(content.field("Players"), Some("50 (+3) / 50 (+10)"));
    assert_eq!(content.field("Next Layer"), Some(PENDING_VOTE));
    assert_eq!(content.color, 0x55ff00);

    let presence = platform.presence.lock().unwrap().clone();
    assert_eq!(
        presence,
        vec![("(50/50) Narva_RAAS_v1".to_string(), ActivityKind::Watching)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_mounted_sync_follows_published_snapshots() {
    let platform = Arc::new(MemoryPlatform::with_messages("status", &["live"]));
    let snapshot = SharedSnapshot::new(narva());
    let config = SyncConfig {
        update_interval_ms: 1_000,
        disable_status: false,
        targets: vec![TargetRef::new("status", "live")],
    };
    let mut sync = StatusSync::new(Reconciler::new(
        config,
        "footer",
        platform.clone(),
        Arc::new(snapshot.clone()),
    ));
    sync.mount().unwrap();

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert_eq!(
        platform.content("live").unwrap().field("Players"),
        Some("50 (+3) / 50 (+10)")
    );

    snapshot
        .publish(ServerSnapshot {
            current_players: 12,
            public_queue: 0,
            next_layer: NextLayer::Known("Gorodok_AAS_v2".to_string()),
            ..narva()
        })
        .await;

    tokio::time::sleep(Duration::from_secs(1)).await;
    let content = platform.content("live").unwrap();
    assert_eq!(content.field("Players"), Some("12 / 50 (+10)"));
    assert_eq!(content.field("Next Layer"), Some("Gorodok_AAS_v2"));

    sync.unmount();
    assert_eq!(platform.presence.lock().unwrap().len(), 2);
}
