use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::platform::{ActivityKind, ChannelHandle, MessageHandle, Platform};
use crate::status::RenderedPayload;
use crate::types::{PlatformError, StatusError};

use super::api_types::{ChannelResponse, EditMessageBody, MessageResponse};
use super::gateway::{Presence, PresenceGateway};

const TOKEN_ENV: &str = "DISCORD_TOKEN";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
const USER_AGENT: &str = concat!("DiscordBot (squad-status-sync, ", env!("CARGO_PKG_VERSION"), ")");

/// Discord client: REST for status messages, an optional gateway session for presence.
#[derive(Clone)]
pub struct DiscordClient {
    token: String,
    http: Client,
    base_url: String,
    gateway: Option<Arc<PresenceGateway>>,
}

impl DiscordClient {
    /// Build a client from config and the DISCORD_TOKEN environment variable.
    pub fn from_env(config: &Config) -> Result<Self, StatusError> {
        let token = env::var(TOKEN_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(StatusError::MissingToken)?;
        Self::new(token, &config.discord_api_url)
    }

    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self, StatusError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(StatusError::Http)?;

        Ok(Self {
            token: token.into(),
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            gateway: None,
        })
    }

    /// Opens a gateway session with the same token and routes presence through it.
    pub fn with_presence_gateway(mut self, gateway_url: &str) -> Result<Self, StatusError> {
        let gateway = PresenceGateway::spawn(self.token.clone(), gateway_url)?;
        self.gateway = Some(Arc::new(gateway));
        Ok(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("Authorization", format!("Bot {}", self.token))
    }

    async fn get_json<T>(&self, path: &str, kind: &'static str, id: &str) -> Result<T, PlatformError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path).send().await?;
        let response = check_status(response, path, kind, id)?;
        response.json::<T>().await.map_err(PlatformError::Http)
    }
}

fn check_status(
    response: Response,
    path: &str,
    kind: &'static str,
    id: &str,
) -> Result<Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(PlatformError::not_found(kind, id));
    }
    Err(PlatformError::Api {
        path: path.to_string(),
        status: status.as_u16(),
    })
}

#[async_trait]
impl Platform for DiscordClient {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelHandle, PlatformError> {
        let path = format!("/channels/{channel_id}");
        let channel: ChannelResponse = self.get_json(&path, "channel", channel_id).await?;
        Ok(ChannelHandle {
            id: channel.id,
            name: channel.name,
        })
    }

    async fn fetch_message(
        &self,
        channel: &ChannelHandle,
        message_id: &str,
    ) -> Result<MessageHandle, PlatformError> {
        let path = format!("/channels/{}/messages/{message_id}", channel.id);
        let message: MessageResponse = self.get_json(&path, "message", message_id).await?;
        Ok(MessageHandle {
            channel_id: message.channel_id,
            id: message.id,
        })
    }

    async fn edit_message(
        &self,
        message: &MessageHandle,
        payload: &RenderedPayload,
    ) -> Result<(), PlatformError> {
        let path = format!("/channels/{}/messages/{}", message.channel_id, message.id);
        let body = EditMessageBody::from_payload(payload);
        let response = self
            .request(Method::PATCH, &path)
            .json(&body)
            .send()
            .await?;
        check_status(response, &path, "message", &message.id)?;
        debug!(channel = %message.channel_id, message = %message.id, "Edited status message");
        Ok(())
    }

    async fn set_presence(&self, text: &str, kind: ActivityKind) -> Result<(), PlatformError> {
        let gateway = self.gateway.as_ref().ok_or(PlatformError::Unsupported(
            "presence updates need a gateway session",
        ))?;
        gateway.update(Presence {
            text: text.to_string(),
            kind,
        })
    }
}
