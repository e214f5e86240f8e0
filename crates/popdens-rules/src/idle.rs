//! Idle-timer bookkeeping for players who deal damage.

use popdens_plugin_api::{EntityKind, ServerApi};
use tracing::trace;

/// Reset the idle timer of the player behind `damager`, if there is one.
/// Returns whether a timer was reset.
pub fn reset_attacker_idle_timer(damager: &EntityKind, api: &mut dyn ServerApi) -> bool {
    let Some(player) = damager.responsible_player() else {
        return false;
    };
    trace!("Resetting idle timer for {}", player.name);
    api.reset_idle_timer(player);
    true
}
