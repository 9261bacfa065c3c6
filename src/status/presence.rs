use crate::server::ServerSnapshot;

use super::embed::UNKNOWN_LAYER;

/// Short bot status, e.g. `(50/80) Narva_RAAS_v1`.
pub fn presence_text(snapshot: &ServerSnapshot) -> String {
    format!(
        "({}/{}) {}",
        snapshot.current_players,
        snapshot.public_slots,
        snapshot.current_layer_name().unwrap_or(UNKNOWN_LAYER)
    )
}
