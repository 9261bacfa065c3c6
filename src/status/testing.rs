use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::platform::{ActivityKind, ChannelHandle, MessageHandle, Platform};
use crate::types::PlatformError;

use super::embed::RenderedPayload;

/// In-memory platform that records every edit and presence update.
#[derive(Default)]
pub struct RecordingPlatform {
    messages: Mutex<HashMap<String, HashSet<String>>>,
    edits: Mutex<Vec<(MessageHandle, RenderedPayload)>>,
    presence: Mutex<Vec<String>>,
    failing_edits: Mutex<HashSet<String>>,
    fail_presence: Mutex<bool>,
    edit_delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&self, channel_id: &str, message_id: &str) {
        self.messages
            .lock()
            .unwrap()
            .entry(channel_id.to_string())
            .or_default()
            .insert(message_id.to_string());
    }

    pub fn fail_edits_for(&self, message_id: &str) {
        self.failing_edits
            .lock()
            .unwrap()
            .insert(message_id.to_string());
    }

    pub fn fail_presence(&self) {
        *self.fail_presence.lock().unwrap() = true;
    }

    pub fn set_edit_delay(&self, delay: Duration) {
        *self.edit_delay.lock().unwrap() = Some(delay);
    }

    pub fn edit_count(&self, channel_id: &str, message_id: &str) -> usize {
        self.edits
            .lock()
            .unwrap()
            .iter()
            .filter(|(handle, _)| handle.channel_id == channel_id && handle.id == message_id)
            .count()
    }

    pub fn total_edits(&self) -> usize {
        self.edits.lock().unwrap().len()
    }

    pub fn edited_payload(&self, channel_id: &str, message_id: &str) -> Option<RenderedPayload> {
        self.edits
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(handle, _)| handle.channel_id == channel_id && handle.id == message_id)
            .map(|(_, payload)| payload.clone())
    }

    pub fn presence_calls(&self) -> Vec<String> {
        self.presence.lock().unwrap().clone()
    }

    pub fn max_concurrent_edits(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelHandle, PlatformError> {
        if self.messages.lock().unwrap().contains_key(channel_id) {
            Ok(ChannelHandle {
                id: channel_id.to_string(),
                name: None,
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
        let known = self
            .messages
            .lock()
            .unwrap()
            .get(&channel.id)
            .is_some_and(|ids| ids.contains(message_id));
        if known {
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
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.edit_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_edits.lock().unwrap().contains(&message.id) {
            return Err(PlatformError::Api {
                path: format!("/channels/{}/messages/{}", message.channel_id, message.id),
                status: 500,
            });
        }

        self.edits
            .lock()
            .unwrap()
            .push((message.clone(), payload.clone()));
        Ok(())
    }

    async fn set_presence(&self, text: &str, _kind: ActivityKind) -> Result<(), PlatformError> {
        if *self.fail_presence.lock().unwrap() {
            return Err(PlatformError::Api {
                path: "presence".to_string(),
                status: 503,
            });
        }
        self.presence.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
