use async_trait::async_trait;

use crate::status::RenderedPayload;
use crate::types::PlatformError;

/// A channel that has been looked up on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: String,
    pub name: Option<String>,
}

/// An existing message that can be edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel_id: String,
    pub id: String,
}

/// How the bot status reads in the client, e.g. "Watching ...".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    #[default]
    Watching,
    Competing,
}

impl ActivityKind {
    /// Activity type code used by the Discord gateway.
    pub fn code(self) -> u8 {
        match self {
            ActivityKind::Playing => 0,
            ActivityKind::Streaming => 1,
            ActivityKind::Listening => 2,
            ActivityKind::Watching => 3,
            ActivityKind::Competing => 5,
        }
    }
}

/// The narrow slice of a chat platform client the status sync needs.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelHandle, PlatformError>;

    async fn fetch_message(
        &self,
        channel: &ChannelHandle,
        message_id: &str,
    ) -> Result<MessageHandle, PlatformError>;

    async fn edit_message(
        &self,
        message: &MessageHandle,
        payload: &RenderedPayload,
    ) -> Result<(), PlatformError>;

    async fn set_presence(&self, text: &str, kind: ActivityKind) -> Result<(), PlatformError>;
}
