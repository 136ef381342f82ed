#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Troposphere simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Entity records, geometry, the rewind history and the tuning tree
//! live here so every crate agrees on a single data model.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod entities;
mod geometry;
mod history;
pub mod random;
mod tuning;

pub use entities::{
    Camera, CameraTarget, Cloud, CloudLayer, Decoration, Drone, Enemy, Hostile, Ladder, Level,
    LevelBounds, Platform, PlatformId, Player, PlayerState, Portal, TowerDescriptor,
};
pub use geometry::{Collidable, Margins, Point, Positioned, Rect};
pub use history::{PositionHistory, Rewindable};
pub use tuning::{ActorTuning, CameraTuning, EnergyTuning, PlayerTuning, RewindTuning, Tuning};

/// Energy a fresh player starts with; the upper bound of the energy meter.
pub const MAX_ENERGY: u32 = 10_000;

/// Nominal simulation rate in ticks per second.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Seconds of history retained for time travel.
pub const TIME_BACK_MAX_SECONDS: u32 = 2;

/// Maximum number of rewind ticks, and of positions any history keeps.
pub const TIME_BACK_MAX_FRAMES: u32 = FRAMES_PER_SECOND * TIME_BACK_MAX_SECONDS;

/// Highest playable level number. Level `0` is the idle start screen.
pub const MAX_LEVEL: u32 = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Generates and activates the level with the provided number.
    StartLevel {
        /// Catalogue number of the level to start.
        number: u32,
    },
    /// Regenerates the currently active level from scratch.
    RestartLevel,
    /// Advances the simulation by one fixed-rate tick.
    Tick {
        /// Control flags sampled at the start of the tick.
        input: ControlInput,
        /// Monotonic timestamp of the tick.
        now: Duration,
    },
    /// Binds the camera to the player and resets its zoom.
    FollowPlayer,
    /// Unbinds the camera and frames the whole level.
    ZoomToLevel,
    /// Starts a camera shake impulse.
    ShakeCamera {
        /// Initial displacement amplitude.
        power: f32,
        /// Seconds until the shake has fully decayed.
        length: f32,
    },
    /// Updates the size of the drawing surface the camera maps onto.
    ConfigureViewport {
        /// Width of the surface.
        width: f32,
        /// Height of the surface.
        height: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A level was generated and is now active.
    LevelStarted {
        /// Catalogue number of the level.
        number: u32,
    },
    /// A level beyond the catalogue was requested.
    GameFinished,
    /// The simulation completed a tick.
    TimeAdvanced {
        /// Number of ticks processed since the level started.
        tick: u64,
    },
    /// Rewind was requested but energy or depth ran out; the tick was frozen.
    TimeTravelRefused,
    /// A hostile touched the player.
    PlayerHit {
        /// Player energy after the hit penalty.
        energy: u32,
    },
    /// The player hit the ground after a deadly fall.
    PlayerDied {
        /// Vertical velocity at impact.
        impact_velocity: f32,
    },
    /// The player reached a portal.
    LevelFinished {
        /// Catalogue number of the finished level.
        number: u32,
    },
    /// The camera started shaking.
    CameraShaken {
        /// Initial shake amplitude.
        power: f32,
    },
}

/// Movement keys held during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementKeys {
    /// Left arrow or `A`.
    pub left: bool,
    /// Right arrow or `D`.
    pub right: bool,
    /// Up arrow or `W`.
    pub up: bool,
    /// Down arrow or `S`.
    pub down: bool,
}

/// Control flags sampled once per tick and immutable for its duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlInput {
    /// Directional keys.
    pub movement: MovementKeys,
    /// Space or `G`: anti-gravity, which also triggers a jump.
    pub anti_gravity: bool,
    /// `T`: travel back in time.
    pub rewind: bool,
}

impl ControlInput {
    /// Input with nothing pressed.
    pub const IDLE: ControlInput = ControlInput {
        movement: MovementKeys {
            left: false,
            right: false,
            up: false,
            down: false,
        },
        anti_gravity: false,
        rewind: false,
    };

    /// Reports whether any jump key is down.
    #[must_use]
    pub const fn jump_requested(&self, stop_climbing: bool) -> bool {
        (self.movement.up && !stop_climbing) || self.anti_gravity
    }
}
