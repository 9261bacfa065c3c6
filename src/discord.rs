mod api_types;
mod client;
mod gateway;

pub use client::DiscordClient;
pub use gateway::{Presence, PresenceGateway};
