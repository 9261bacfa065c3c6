mod color;
mod embed;
mod presence;
mod scheduler;
mod sync;

#[cfg(test)]
mod testing;

pub use color::{gradient_at, occupancy_color, GradientStop, Rgb, OCCUPANCY_GRADIENT};
pub use embed::{
    next_layer_field, players_field, EmbedField, RenderedPayload, PENDING_VOTE, UNKNOWN_LAYER,
};
pub use presence::presence_text;
pub use scheduler::StatusSync;
pub use sync::{
    sync_target, sync_targets, update_presence, PresenceOutcome, Reconciler, TargetReport,
    TickReport,
};
