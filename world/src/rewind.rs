//! Time travel gating and the per-entity rewind protocol.

use troposphere_core::{EnergyTuning, Player, Rewindable};

/// Direction simulated time moves in during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimeFlow {
    /// Entities run their own update after recording their position.
    Forward,
    /// Entities step back to their most recently recorded position.
    Rewind,
    /// Rewind was requested but refused; nothing moves this tick.
    Frozen,
}

/// Charges the player for a rewind tick, or winds the depth counter down
/// once the rewind key is released.
///
/// A rewind tick costs `time_travel_cost` energy and one unit of depth. It is
/// refused when either budget is exhausted.
pub(crate) fn gate(
    player: &mut Player,
    rewind_requested: bool,
    energy: &EnergyTuning,
    max_frames: u32,
) -> TimeFlow {
    if !rewind_requested {
        player.time_travel_frames = player.time_travel_frames.saturating_sub(1);
        player.is_time_travelling = false;
        return TimeFlow::Forward;
    }

    let affordable = player.energy >= energy.time_travel_cost;
    if affordable && player.time_travel_frames < max_frames {
        player.energy -= energy.time_travel_cost;
        player.time_travel_frames += 1;
        player.is_time_travelling = true;
        TimeFlow::Rewind
    } else {
        TimeFlow::Frozen
    }
}

/// Advances one entity through the rewind protocol.
///
/// Going forward records the pre-update position before running `update`.
/// Rewinding pops the latest recorded position; an empty history leaves the
/// entity where it is. A frozen tick touches nothing.
pub(crate) fn replay<E, F>(entity: &mut E, flow: TimeFlow, update: F)
where
    E: Rewindable,
    F: FnOnce(&mut E),
{
    match flow {
        TimeFlow::Forward => {
            let position = entity.position();
            entity.history_mut().push(position);
            update(entity);
        }
        TimeFlow::Rewind => {
            if let Some(position) = entity.history_mut().pop() {
                entity.set_position(position);
            }
        }
        TimeFlow::Frozen => {}
    }
}
