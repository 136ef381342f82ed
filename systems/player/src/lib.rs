#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player physics and state machine.
//!
//! One call to [`PlayerPhysics::step`] advances the player by a single tick:
//! ladder and platform probing, control resolution, knock-back decay, gravity
//! and finally position resolution against the level bounds. The only side
//! effect outside the player record is a camera shake, emitted as a
//! [`Command`] when a deadly fall ends.

use std::time::Duration;

use troposphere_core::{
    CameraTuning, Command, ControlInput, Ladder, LevelBounds, Platform, Player, PlayerState,
    PlayerTuning, Rect, Tuning,
};

/// Configuration parameters required to construct the physics system.
#[derive(Clone, Debug, Default)]
pub struct Config {
    player: PlayerTuning,
    shake: CameraTuning,
}

impl Config {
    /// Creates a configuration from explicit movement and shake tuning.
    #[must_use]
    pub const fn new(player: PlayerTuning, shake: CameraTuning) -> Self {
        Self { player, shake }
    }

    /// Extracts the relevant sections of the full tuning tree.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.player.clone(), tuning.camera.clone())
    }
}

/// Static level geometry the player collides with.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings<'a> {
    /// Platforms; backgrounds among them are ignored.
    pub platforms: &'a [Platform],
    /// Ladders.
    pub ladders: &'a [Ladder],
    /// Level extent.
    pub bounds: LevelBounds,
}

/// Result of a physics step that the caller needs to react to.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub enum StepOutcome {
    /// Nothing noteworthy happened.
    Continued,
    /// The player hit the floor at the end of a deadly fall.
    Died {
        /// Vertical velocity at impact.
        impact_velocity: f32,
    },
}

/// Ladder overlap summary for the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LadderContact {
    /// The player overlaps at least one ladder.
    pub touching: bool,
    /// The player's top edge lies strictly inside an overlapped ladder.
    pub high: bool,
}

impl LadderContact {
    /// Probes every ladder against the player's collision box.
    #[must_use]
    pub fn probe(body: &Rect, ladders: &[Ladder]) -> Self {
        let mut contact = Self::default();
        for ladder in ladders.iter().filter(|ladder| ladder.bounds.overlaps(body)) {
            contact.touching = true;
            if ladder.bounds.y < body.y && body.y < ladder.bounds.bottom() {
                contact.high = true;
            }
        }
        contact
    }
}

/// Returns the first solid platform the player overlaps whose bottom edge is
/// still below the player's feet.
#[must_use]
pub fn supporting_platform(body: &Rect, platforms: &[Platform]) -> Option<Rect> {
    platforms
        .iter()
        .filter(|platform| !platform.is_background)
        .map(|platform| platform.bounds)
        .find(|bounds| body.overlaps(bounds) && body.bottom() < bounds.bottom())
}

#[derive(Clone, Copy, Debug, Default)]
struct Movement {
    dx: f32,
    dy: f32,
}

/// Pure system that integrates player physics one tick at a time.
#[derive(Clone, Debug, Default)]
pub struct PlayerPhysics {
    tuning: PlayerTuning,
    shake: CameraTuning,
}

impl PlayerPhysics {
    /// Creates the system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.player,
            shake: config.shake,
        }
    }

    /// Movement tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Advances the player by one tick.
    ///
    /// `now` is the monotonic timestamp of the tick; it drives the ledge jump
    /// grace window and the swirl hide delay.
    pub fn step(
        &self,
        player: &mut Player,
        input: &ControlInput,
        surroundings: &Surroundings<'_>,
        now: Duration,
        out: &mut Vec<Command>,
    ) -> StepOutcome {
        match player.state {
            PlayerState::Dead => return StepOutcome::Continued,
            PlayerState::Swirling => {
                self.advance_swirl(player, now);
                return StepOutcome::Continued;
            }
            PlayerState::OnPlatform | PlayerState::Falling | PlayerState::Climbing => {}
        }

        let platform = supporting_platform(&player.body, surroundings.platforms);
        if platform.is_some() {
            player.latest_on_platform = Some(now);
        }

        let ladder = LadderContact::probe(&player.body, surroundings.ladders);
        let mut movement = Movement::default();

        if !ladder.touching && player.state == PlayerState::Climbing {
            player.state = PlayerState::Falling;
        } else if player.y_vel > self.tuning.deadly_falling_speed && !player.anti_gravity {
            if !player.falling_to_ground {
                player.falling_to_ground = true;
                player.body.rotate_quarter();
            }
        } else if !player.falling_to_ground {
            movement = self.resolve_controls(
                player,
                input,
                &surroundings.bounds,
                ladder,
                platform,
                now,
            );
        }

        movement.dx += self.decay_impulse(player);

        if player.state == PlayerState::Falling {
            player.y_vel += if player.anti_gravity {
                self.tuning.anti_gravity
            } else {
                self.tuning.gravity
            };
            movement.dy += player.y_vel;
        }

        resolve_horizontal(player, &surroundings.bounds, movement.dx);
        self.resolve_vertical(player, &surroundings.bounds, platform, movement.dy, out)
    }

    /// Applies an enemy knock-back unless the player is already flying fast.
    /// A zero `direction` pushes nowhere.
    pub fn knock_back(&self, player: &mut Player, direction: f32) {
        if direction == 0.0 {
            return;
        }
        if player.x_vel.abs() < self.tuning.hit_impulse_cap {
            player.x_vel += direction.signum() * self.tuning.hit_impulse;
        }
    }

    /// Starts the finish swirl. A dead player stays dead.
    pub fn begin_swirl(&self, player: &mut Player, now: Duration) {
        if matches!(player.state, PlayerState::Dead | PlayerState::Swirling) {
            return;
        }
        player.state = PlayerState::Swirling;
        player.swirl_started = Some(now);
    }

    fn advance_swirl(&self, player: &mut Player, now: Duration) {
        let started = player.swirl_started.unwrap_or(now);
        if !player.hidden && now.saturating_sub(started) > self.tuning.swirl_hide_delay() {
            player.hidden = true;
            player.body.y = self.tuning.hidden_y;
        }
        player.swirl_angle += self.tuning.swirl_angle_step;
    }

    fn resolve_controls(
        &self,
        player: &mut Player,
        input: &ControlInput,
        bounds: &LevelBounds,
        ladder: LadderContact,
        platform: Option<Rect>,
        now: Duration,
    ) -> Movement {
        let tuning = &self.tuning;
        let keys = input.movement;
        let mut movement = Movement::default();

        if keys.left && player.body.x > bounds.left {
            movement.dx = -tuning.speed;
            player.facing_left = true;
            if player.state != PlayerState::Falling {
                player.walk_counter += 1;
            }
        } else if keys.right && player.body.x < bounds.width - player.body.width {
            movement.dx = tuning.speed;
            player.facing_left = false;
            if player.state != PlayerState::Falling {
                player.walk_counter += 1;
            }
        }

        // Up has to be released before it jumps again after leaving a ladder.
        if !keys.up {
            player.stop_climbing = false;
        }

        let standing_still = movement.dx == 0.0;
        if input.jump_requested(player.stop_climbing) {
            let within_grace = player
                .latest_on_platform
                .is_some_and(|seen| now.saturating_sub(seen) < tuning.ledge_grace());
            let on_ground = player.is_on_ground(bounds, tuning.ground_margin);

            if player.state == PlayerState::Climbing
                && standing_still
                && platform.is_some()
                && !ladder.high
            {
                player.state = PlayerState::OnPlatform;
                player.stop_climbing = true;
            } else if (platform.is_some() || within_grace || on_ground)
                && !(standing_still && ladder.high)
            {
                player.y_vel = tuning.jump_velocity;
                player.state = PlayerState::Falling;
                player.latest_on_platform = None;
            } else if player.y_vel >= 0.0 && ladder.touching {
                player.state = PlayerState::Climbing;
                player.y_vel = 0.0;
                movement.dy -= tuning.climb_speed;
            }
            if player.state == PlayerState::Climbing {
                player.walk_counter += 1;
            }
        } else if keys.down && ladder.touching {
            player.state = PlayerState::Climbing;
            player.y_vel = 0.0;
            movement.dy += tuning.climb_speed;
            player.walk_counter += 1;
        }

        if player.walk_counter > tuning.walk_cycle * 2 {
            player.walk_counter = 0;
        }

        movement
    }

    fn decay_impulse(&self, player: &mut Player) -> f32 {
        if player.x_vel == 0.0 {
            return 0.0;
        }
        let dx = player.x_vel;
        if player.x_vel.abs() > self.tuning.impulse_snap {
            player.x_vel *= self.tuning.impulse_decay;
        } else {
            player.x_vel = 0.0;
        }
        dx
    }

    fn resolve_vertical(
        &self,
        player: &mut Player,
        bounds: &LevelBounds,
        platform: Option<Rect>,
        dy: f32,
        out: &mut Vec<Command>,
    ) -> StepOutcome {
        let floor = bounds.height - player.body.height;

        if player.body.y + dy >= floor {
            player.body.y = floor;
            let impact_velocity = player.y_vel;
            player.y_vel = 0.0;
            if player.falling_to_ground {
                out.push(self.impact_shake(impact_velocity));
                player.state = PlayerState::Dead;
                return StepOutcome::Died { impact_velocity };
            }
            player.state = PlayerState::OnPlatform;
        } else if player.falling_to_ground {
            player.state = PlayerState::Falling;
            player.body.y += dy;
        } else if player.state == PlayerState::Climbing {
            player.body.y += dy;
        } else if let Some(support) = platform.filter(|_| dy >= 0.0) {
            player.body.y = support.y - player.body.height + self.tuning.landing_margin;
            player.y_vel = 0.0;
            player.state = PlayerState::OnPlatform;
        } else {
            player.state = PlayerState::Falling;
            player.body.y += dy;
        }

        StepOutcome::Continued
    }

    fn impact_shake(&self, impact_velocity: f32) -> Command {
        let shake = &self.shake;
        let excess = (impact_velocity - shake.shake_velocity_offset).max(0.0);
        let power = excess.min(shake.shake_top_velocity) / shake.shake_top_velocity
            * shake.shake_max_power;
        Command::ShakeCamera {
            power,
            length: shake.shake_length,
        }
    }
}

fn resolve_horizontal(player: &mut Player, bounds: &LevelBounds, dx: f32) {
    let right_limit = bounds.width - player.body.width;
    if player.body.x + dx > right_limit {
        player.body.x = right_limit;
        player.x_vel = 0.0;
    } else if player.body.x + dx < bounds.left {
        player.body.x = bounds.left;
        player.x_vel = 0.0;
    } else {
        player.body.x += dx;
    }
}
