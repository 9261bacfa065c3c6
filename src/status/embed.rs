use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::server::{NextLayer, ServerSnapshot};

use super::color::occupancy_color;

pub const UNKNOWN_LAYER: &str = "Unknown";
pub const PENDING_VOTE: &str = "To be voted";

/// Rendered status card for one tick. Rebuilt from scratch every time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPayload {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: String, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline,
        }
    }
}

impl RenderedPayload {
    /// Renders the snapshot against the current clock.
    pub fn render(snapshot: &ServerSnapshot, footer: &str) -> Self {
        Self::render_at(snapshot, footer, Utc::now())
    }

    pub fn render_at(snapshot: &ServerSnapshot, footer: &str, now: DateTime<Utc>) -> Self {
        let fields = vec![
            EmbedField::new("Players", players_field(snapshot), false),
            EmbedField::new(
                "Current Layer",
                snapshot
                    .current_layer_name()
                    .unwrap_or(UNKNOWN_LAYER)
                    .to_string(),
                true,
            ),
            EmbedField::new("Next Layer", next_layer_field(&snapshot.next_layer), true),
        ];

        Self {
            title: snapshot.server_name.clone(),
            color: occupancy_color(snapshot.occupancy_ratio()).to_u32(),
            fields,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            footer: footer.to_string(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

/// `players (+queue) / public (+reserve)`, suffixes only when non-zero.
pub fn players_field(snapshot: &ServerSnapshot) -> String {
    let mut players = snapshot.current_players.to_string();

    let queue = snapshot.queue_size();
    if queue > 0 {
        players.push_str(&format!(" (+{queue})"));
    }

    players.push_str(&format!(" / {}", snapshot.public_slots));
    if snapshot.reserve_slots > 0 {
        players.push_str(&format!(" (+{})", snapshot.reserve_slots));
    }

    players
}

pub fn next_layer_field(next_layer: &NextLayer) -> String {
    match next_layer {
        NextLayer::Known(name) => name.clone(),
        NextLayer::PendingVote => PENDING_VOTE.to_string(),
        NextLayer::Unknown => UNKNOWN_LAYER.to_string(),
    }
}
