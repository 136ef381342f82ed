//! Tuning knobs for every adjustable aspect of the simulation.
//!
//! Defaults reproduce the shipped game. Every struct deserialises with
//! `#[serde(default)]`, so overrides only need to name the fields they change.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{FRAMES_PER_SECOND, MAX_ENERGY, TIME_BACK_MAX_SECONDS};

/// Aggregated tuning surface consumed by the world and its systems.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player movement and state machine constants.
    pub player: PlayerTuning,
    /// Energy budget and per-action costs.
    pub energy: EnergyTuning,
    /// Rewind buffer sizing.
    pub rewind: RewindTuning,
    /// Camera shake response.
    pub camera: CameraTuning,
    /// Enemy, drone and level-flow timings.
    pub actors: ActorTuning,
}

/// Player movement constants. Velocities are expressed in units per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal speed while a direction key is held.
    pub speed: f32,
    /// Vertical velocity applied when a jump starts.
    pub jump_velocity: f32,
    /// Vertical distance covered per tick on a ladder.
    pub climb_speed: f32,
    /// Falling faster than this without anti-gravity is fatal on landing.
    pub deadly_falling_speed: f32,
    /// Window after leaving a platform during which a jump is still allowed.
    pub ledge_grace_ms: u64,
    /// Gravity added to the vertical velocity each falling tick.
    pub gravity: f32,
    /// Gravity used while anti-gravity is active.
    pub anti_gravity: f32,
    /// Width of the upright collision box.
    pub standing_width: f32,
    /// Height of the upright collision box.
    pub standing_height: f32,
    /// Distance above the level floor that still counts as standing on it.
    pub ground_margin: f32,
    /// Overlap kept when snapping onto a platform.
    pub landing_margin: f32,
    /// Multiplier applied to the knock-back velocity each tick.
    pub impulse_decay: f32,
    /// Knock-back speeds at or below this snap to zero.
    pub impulse_snap: f32,
    /// Knock-back velocity applied by an enemy hit.
    pub hit_impulse: f32,
    /// Hits are ignored while the knock-back speed is at or above this.
    pub hit_impulse_cap: f32,
    /// Walk counter value at which the stride sprite changes.
    pub walk_cycle: u32,
    /// Delay after a swirl starts before the player is hidden.
    pub swirl_hide_ms: u64,
    /// Rotation added to the swirl animation each tick, in radians.
    pub swirl_angle_step: f32,
    /// Vertical position the player is parked at once hidden.
    pub hidden_y: f32,
}

impl PlayerTuning {
    /// Ledge grace as a duration.
    #[must_use]
    pub fn ledge_grace(&self) -> Duration {
        Duration::from_millis(self.ledge_grace_ms)
    }

    /// Swirl hide delay as a duration.
    #[must_use]
    pub fn swirl_hide_delay(&self) -> Duration {
        Duration::from_millis(self.swirl_hide_ms)
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 7.0,
            jump_velocity: -15.0,
            climb_speed: 2.0,
            deadly_falling_speed: 40.0,
            ledge_grace_ms: 200,
            gravity: 1.0,
            anti_gravity: 0.5,
            standing_width: 30.0,
            standing_height: 90.0,
            ground_margin: 5.0,
            landing_margin: 5.0,
            impulse_decay: 0.97,
            impulse_snap: 4.0,
            hit_impulse: 20.0,
            hit_impulse_cap: 100.0,
            walk_cycle: 5,
            swirl_hide_ms: 500,
            swirl_angle_step: std::f32::consts::PI / 32.0,
            hidden_y: -200.0,
        }
    }
}

/// Energy budget shared by anti-gravity, time travel and enemy hits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyTuning {
    /// Energy a fresh player starts with and can never exceed.
    pub max: u32,
    /// Cost per tick of holding anti-gravity.
    pub anti_gravity_cost: u32,
    /// Cost per tick of travelling back in time.
    pub time_travel_cost: u32,
    /// Penalty charged when an enemy touches the player.
    pub enemy_hit_cost: u32,
    /// Below this the HUD reports low energy.
    pub low_threshold: u32,
    /// Below this the HUD reports very low energy.
    pub very_low_threshold: u32,
}

impl Default for EnergyTuning {
    fn default() -> Self {
        Self {
            max: MAX_ENERGY,
            anti_gravity_cost: 5,
            time_travel_cost: 35,
            enemy_hit_cost: 1_000,
            low_threshold: 4_000,
            very_low_threshold: 2_000,
        }
    }
}

/// Rewind buffer sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewindTuning {
    /// Nominal simulation rate.
    pub frames_per_second: u32,
    /// Seconds of history each entity keeps.
    pub max_seconds: u32,
}

impl RewindTuning {
    /// Maximum number of stored positions and of consecutive rewind ticks.
    #[must_use]
    pub fn max_frames(&self) -> u32 {
        self.frames_per_second.saturating_mul(self.max_seconds)
    }
}

impl Default for RewindTuning {
    fn default() -> Self {
        Self {
            frames_per_second: FRAMES_PER_SECOND,
            max_seconds: TIME_BACK_MAX_SECONDS,
        }
    }
}

/// Camera shake response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Impact velocity mapped to the strongest shake.
    pub shake_top_velocity: f32,
    /// Impact velocity absorbed before any shake is produced.
    pub shake_velocity_offset: f32,
    /// Strongest shake power produced by a fatal landing.
    pub shake_max_power: f32,
    /// Seconds a shake takes to decay completely.
    pub shake_length: f32,
    /// Seconds of decay applied per tick.
    pub tick_seconds: f32,
    /// Width of the drawing surface.
    pub viewport_width: f32,
    /// Height of the drawing surface.
    pub viewport_height: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            shake_top_velocity: 80.0,
            shake_velocity_offset: 20.0,
            shake_max_power: 20.0,
            shake_length: 0.5,
            tick_seconds: 1.0 / FRAMES_PER_SECOND as f32,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

/// Enemy, drone and level-flow timings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    /// Drones pick a new waypoint once this close to their current one.
    pub drone_arrival_radius: f32,
    /// How long a hit ground enemy shows its hit sprite.
    pub enemy_hit_flash_ms: u64,
    /// Delay between finishing a level and starting the next one.
    pub level_advance_ms: u64,
}

impl ActorTuning {
    /// Hit flash as a duration.
    #[must_use]
    pub fn enemy_hit_flash(&self) -> Duration {
        Duration::from_millis(self.enemy_hit_flash_ms)
    }

    /// Level advance delay as a duration.
    #[must_use]
    pub fn level_advance_delay(&self) -> Duration {
        Duration::from_millis(self.level_advance_ms)
    }
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            drone_arrival_radius: 200.0,
            enemy_hit_flash_ms: 1_000,
            level_advance_ms: 1_500,
        }
    }
}
