//! Keeps Discord status messages and the bot presence in sync with a Squad server.

pub mod config;
pub mod discord;
pub mod platform;
pub mod server;
pub mod status;
pub mod types;

pub use config::{Config, SyncConfig, TargetRef};
pub use platform::{ActivityKind, ChannelHandle, MessageHandle, Platform};
pub use server::{NextLayer, ServerSnapshot, SnapshotSource};
pub use status::{Reconciler, RenderedPayload, StatusSync, TickReport};
pub use types::{PlatformError, StatusError, SyncFailure};
