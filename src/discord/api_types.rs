use serde::{Deserialize, Serialize};

use crate::status::RenderedPayload;

#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub channel_id: String,
}

/// Body of `PATCH /channels/{channel}/messages/{message}`.
#[derive(Debug, Serialize)]
pub struct EditMessageBody<'a> {
    pub content: &'a str,
    pub embeds: Vec<EmbedBody<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EmbedBody<'a> {
    pub title: &'a str,
    pub color: u32,
    pub fields: Vec<EmbedFieldBody<'a>>,
    pub timestamp: &'a str,
    pub footer: EmbedFooterBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct EmbedFieldBody<'a> {
    pub name: &'a str,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooterBody<'a> {
    pub text: &'a str,
}

impl<'a> EditMessageBody<'a> {
    /// Replaces the whole message with a single embed and clears any text content.
    pub fn from_payload(payload: &'a RenderedPayload) -> Self {
        let fields = payload
            .fields
            .iter()
            .map(|field| EmbedFieldBody {
                name: &field.name,
                value: code_block(&field.value),
                inline: field.inline,
            })
            .collect();

        Self {
            content: "",
            embeds: vec![EmbedBody {
                title: &payload.title,
                color: payload.color,
                fields,
                timestamp: &payload.timestamp,
                footer: EmbedFooterBody {
                    text: &payload.footer,
                },
            }],
        }
    }
}

fn code_block(value: &str) -> String {
    format!("```{value}```")
}
