#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Troposphere.
//!
//! The [`World`] owns the active [`Level`], the camera, the seeded random
//! stream and the queue of timed follow-up actions. Adapters mutate it only
//! through [`apply`] and read it only through [`query`].
//!
//! A tick runs in a fixed order: due deferred actions, the time travel gate,
//! clouds and hostiles through the rewind protocol, the player, hostile and
//! portal contact, and finally the camera.

mod deferred;
mod rewind;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use troposphere_core::{
    Camera, Collidable, Command, ControlInput, Event, Hostile, Level, LevelBounds, Tuning,
};
use troposphere_system_actors::{drift, oscillate, Actors, Config as ActorsConfig};
use troposphere_system_camera::{
    follow, shake, zoom_to_level, CameraController, Config as CameraConfig,
};
use troposphere_system_level_generation::{
    Config as GeneratorConfig, LevelGenerator, LevelSelection, TowerLayout,
};
use troposphere_system_player::{
    Config as PhysicsConfig, PlayerPhysics, StepOutcome, Surroundings,
};

use deferred::{DeferredAction, DeferredQueue};
use rewind::TimeFlow;

/// Seed used by [`World::new`].
pub const DEFAULT_SEED: u64 = 0x7e0f_5a3c_91d2_4b68;

/// Coarse progress of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The start screen is showing; nothing is simulated.
    Idle,
    /// A level is being played.
    Running,
    /// The player reached the portal; the next level is about to start.
    LevelFinished,
    /// Every level has been completed.
    GameFinished,
}

/// Represents the authoritative Troposphere world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    seed: u64,
    rng: ChaCha8Rng,
    level: Level,
    camera: Camera,
    phase: Phase,
    deferred: DeferredQueue,
    tick_index: u64,
    physics: PlayerPhysics,
    actors: Actors,
    camera_controller: CameraController,
    generator: LevelGenerator,
}

impl World {
    /// Creates a world showing the idle start screen, seeded with [`DEFAULT_SEED`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world with default tuning and the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    /// Creates a world from explicit tuning and seed.
    #[must_use]
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let camera = Camera::new(tuning.camera.viewport_width, tuning.camera.viewport_height);
        let mut world = Self {
            physics: PlayerPhysics::new(PhysicsConfig::from_tuning(&tuning)),
            actors: Actors::new(ActorsConfig::from_tuning(&tuning.actors)),
            camera_controller: CameraController::new(CameraConfig::from_tuning(&tuning.camera)),
            generator: LevelGenerator::new(GeneratorConfig::new(
                tuning.clone(),
                TowerLayout::default(),
            )),
            rng: level_rng(seed, 0),
            level: Level::empty(0, LevelBounds::default()),
            camera,
            phase: Phase::Idle,
            deferred: DeferredQueue::default(),
            tick_index: 0,
            seed,
            tuning,
        };
        let mut ignored = Vec::new();
        world.start_level(0, &mut ignored);
        world
    }

    fn start_level(&mut self, number: u32, out_events: &mut Vec<Event>) {
        self.deferred.clear();
        let mut rng = level_rng(self.seed, number);

        match self.generator.create_level(number, &mut rng) {
            LevelSelection::Ready(level) => {
                self.level = level;
                self.rng = rng;
                self.tick_index = 0;
                self.camera.shake_power = 0.0;
                if number == 0 {
                    self.phase = Phase::Idle;
                    zoom_to_level(&mut self.camera, &self.level.bounds);
                } else {
                    self.phase = Phase::Running;
                    follow(&mut self.camera);
                }
                info!(level = number, "level_started");
                out_events.push(Event::LevelStarted { number });
            }
            LevelSelection::GameFinished => {
                self.phase = Phase::GameFinished;
                info!(requested = number, "game_finished");
                out_events.push(Event::GameFinished);
            }
        }
    }

    fn tick(&mut self, input: ControlInput, now: Duration, out_events: &mut Vec<Event>) {
        if self.phase == Phase::GameFinished {
            return;
        }

        for action in self.deferred.drain_due(now) {
            match action {
                DeferredAction::ClearEnemyHit { hostile } => {
                    if let Some(Hostile::Patroller(enemy)) = self.level.hostiles.get_mut(hostile) {
                        enemy.hit = false;
                    }
                    debug!(hostile, "enemy_hit_cleared");
                }
                DeferredAction::AdvanceLevel => {
                    let next = self.level.number.saturating_add(1);
                    debug!(level = next, "advancing_level");
                    self.start_level(next, out_events);
                    return;
                }
            }
        }

        self.tick_index = self.tick_index.saturating_add(1);
        if self.level.player.is_some() {
            self.simulate(&input, now, out_events);
        }

        let target = self
            .level
            .player
            .as_ref()
            .filter(|player| !player.hidden)
            .map(|player| player.body);
        self.camera_controller
            .update(&mut self.camera, &self.level.bounds, target, &mut self.rng);

        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
    }

    fn simulate(&mut self, input: &ControlInput, now: Duration, out_events: &mut Vec<Event>) {
        let max_frames = self.tuning.rewind.max_frames();
        let level = &mut self.level;
        let Some(player) = level.player.as_mut() else {
            return;
        };

        let flow = rewind::gate(player, input.rewind, &self.tuning.energy, max_frames);
        if flow == TimeFlow::Frozen {
            debug!(
                energy = player.energy,
                depth = player.time_travel_frames,
                "time_travel_refused"
            );
            out_events.push(Event::TimeTravelRefused);
            return;
        }
        let quarry = Some(player.body.origin()).filter(|_| !player.state.is_terminal());

        let width = level.bounds.width;
        for cloud in level
            .clouds_back
            .iter_mut()
            .chain(level.clouds_front.iter_mut())
        {
            rewind::replay(cloud, flow, |cloud| drift(cloud, width));
        }

        let actors = &self.actors;
        let rng = &mut self.rng;
        for hostile in level.hostiles.iter_mut() {
            rewind::replay(hostile, flow, |hostile| {
                actors.step(hostile, &level.platforms, &level.waypoints, quarry, rng);
            });
        }

        let surroundings = Surroundings {
            platforms: &level.platforms,
            ladders: &level.ladders,
            bounds: level.bounds,
        };
        let Some(player) = level.player.as_mut() else {
            return;
        };
        let physics = &self.physics;
        let energy = &self.tuning.energy;
        let mut commands = Vec::new();
        let mut outcome = StepOutcome::Continued;

        if player.state.is_terminal() {
            outcome = physics.step(player, input, &surroundings, now, &mut commands);
        } else {
            rewind::replay(player, flow, |player| {
                player.anti_gravity =
                    input.anti_gravity && player.energy >= energy.anti_gravity_cost;
                if player.anti_gravity {
                    player.energy -= energy.anti_gravity_cost;
                }
                outcome = physics.step(player, input, &surroundings, now, &mut commands);
            });
        }

        if let StepOutcome::Died { impact_velocity } = outcome {
            info!(level = level.number, impact_velocity, "player_died");
            out_events.push(Event::PlayerDied { impact_velocity });
        }

        if !level.finished && !player.state.is_terminal() {
            for (index, hostile) in level.hostiles.iter_mut().enumerate() {
                if !hostile.collides_with(&player.body) {
                    continue;
                }
                if let Hostile::Patroller(enemy) = hostile {
                    enemy.hit = true;
                    self.deferred.schedule(
                        now.saturating_add(self.tuning.actors.enemy_hit_flash()),
                        DeferredAction::ClearEnemyHit { hostile: index },
                    );
                }
                let cost = self.tuning.energy.enemy_hit_cost;
                if player.energy >= cost {
                    player.energy -= cost;
                }
                let direction = player.body.center_x() - hostile.bounds().center_x();
                physics.knock_back(player, direction);
                debug!(hostile = index, energy = player.energy, "player_hit");
                out_events.push(Event::PlayerHit {
                    energy: player.energy,
                });
            }

            let reached_portal = level
                .portals
                .iter()
                .any(|portal| portal.collides_with(&player.body));
            if reached_portal && !player.state.is_terminal() {
                level.finished = true;
                physics.begin_swirl(player, now);
                self.phase = Phase::LevelFinished;
                self.deferred.schedule(
                    now.saturating_add(self.tuning.actors.level_advance_delay()),
                    DeferredAction::AdvanceLevel,
                );
                info!(level = level.number, "level_finished");
                out_events.push(Event::LevelFinished {
                    number: level.number,
                });
            }
        }

        for portal in level.portals.iter_mut() {
            oscillate(portal);
        }

        for command in commands {
            apply(self, command, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel { number } => world.start_level(number, out_events),
        Command::RestartLevel => {
            let number = world.level.number;
            world.start_level(number, out_events);
        }
        Command::Tick { input, now } => world.tick(input, now, out_events),
        Command::FollowPlayer => follow(&mut world.camera),
        Command::ZoomToLevel => zoom_to_level(&mut world.camera, &world.level.bounds),
        Command::ShakeCamera { power, length } => {
            shake(&mut world.camera, power, length);
            out_events.push(Event::CameraShaken {
                power: world.camera.shake_power,
            });
        }
        Command::ConfigureViewport { width, height } => {
            if width > 0.0 && height > 0.0 {
                world.camera.viewport_width = width;
                world.camera.viewport_height = height;
            }
        }
    }
}

// Every level draws from its own stream of the seeded generator, so a level
// plays out the same no matter how the previous one went.
fn level_rng(seed: u64, number: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(u64::from(number));
    rng
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Phase, World};
    use troposphere_core::{Camera, Level, Player, Tuning};

    /// Provides read-only access to the active level.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Number of the active level.
    #[must_use]
    pub fn level_number(world: &World) -> u32 {
        world.level.number
    }

    /// The player, absent on the idle start screen.
    #[must_use]
    pub fn player(world: &World) -> Option<&Player> {
        world.level.player.as_ref()
    }

    /// Remaining player energy, if a player exists.
    #[must_use]
    pub fn energy(world: &World) -> Option<u32> {
        world.level.player.as_ref().map(|player| player.energy)
    }

    /// Provides read-only access to the camera.
    #[must_use]
    pub fn camera(world: &World) -> &Camera {
        &world.camera
    }

    /// Coarse progress of the game.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Reports whether the player has reached the portal.
    #[must_use]
    pub fn is_level_finished(world: &World) -> bool {
        world.level.finished
    }

    /// Reports whether the player has died.
    #[must_use]
    pub fn is_level_failed(world: &World) -> bool {
        world.level.is_failed()
    }

    /// Ticks processed since the active level started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Seed the world's random streams derive from.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Number of timed follow-up actions still waiting to fire.
    #[must_use]
    pub fn pending_actions(world: &World) -> usize {
        world.deferred.len()
    }
}
