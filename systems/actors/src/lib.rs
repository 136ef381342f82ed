#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Behaviour of everything in a level that moves on its own: patrolling
//! ground enemies, waypoint-roaming drones, drifting clouds and the portal's
//! colour cycle.

use rand::Rng;
use troposphere_core::{
    random::random, ActorTuning, Cloud, Drone, Enemy, Hostile, Platform, Point, Portal, Rect,
};

/// Clouds further than this past the right edge wrap around.
const CLOUD_WRAP_OVERSHOOT: f32 = 300.0;
/// Horizontal position a wrapped cloud restarts from.
const CLOUD_RESTART_X: f32 = -600.0;

/// Configuration parameters required to construct the actor system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    arrival_radius: f32,
}

impl Config {
    /// Creates a configuration with the given drone arrival radius.
    #[must_use]
    pub const fn new(arrival_radius: f32) -> Self {
        Self { arrival_radius }
    }

    /// Extracts the relevant knobs from the actor tuning.
    #[must_use]
    pub fn from_tuning(tuning: &ActorTuning) -> Self {
        Self::new(tuning.drone_arrival_radius)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_tuning(&ActorTuning::default())
    }
}

/// Pure system advancing hostiles by one tick.
#[derive(Clone, Debug, Default)]
pub struct Actors {
    config: Config,
}

impl Actors {
    /// Creates the system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Advances any hostile by one tick.
    ///
    /// `quarry` is the player's position when drones may chase it, or `None`
    /// while the player is dead or swirling.
    pub fn step<R: Rng + ?Sized>(
        &self,
        hostile: &mut Hostile,
        platforms: &[Platform],
        waypoints: &[Point],
        quarry: Option<Point>,
        rng: &mut R,
    ) {
        match hostile {
            Hostile::Patroller(enemy) => {
                let platform = platforms
                    .get(enemy.platform.get() as usize)
                    .map(|platform| platform.bounds);
                patrol(enemy, platform.as_ref());
            }
            Hostile::Drone(drone) => self.pursue(drone, waypoints, quarry, rng),
        }
    }

    /// Moves a drone by last tick's velocity, then picks a new heading.
    ///
    /// The heading uses the sign of the delta on each axis independently, so
    /// diagonal travel covers more ground than axis-aligned travel.
    pub fn pursue<R: Rng + ?Sized>(
        &self,
        drone: &mut Drone,
        waypoints: &[Point],
        quarry: Option<Point>,
        rng: &mut R,
    ) {
        drone.bounds.x += drone.dx;
        drone.bounds.y += drone.dy;

        if drone.target.is_none() {
            drone.target = pick_waypoint(waypoints, rng);
        }

        let here = drone.bounds.origin();
        let mut heading = Point::default();

        if let Some(player) = quarry.filter(|player| here.distance(*player) < drone.follow_distance)
        {
            heading = delta(here, player);
            drone.following = true;
        } else if let Some(goal) = drone.target.and_then(|index| waypoints.get(index).copied()) {
            drone.following = false;
            if here.distance(goal) > self.config.arrival_radius {
                heading = delta(here, goal);
            } else {
                drone.target = pick_waypoint(waypoints, rng);
            }
        } else {
            drone.following = false;
        }

        drone.dx = sign(heading.x) * drone.speed;
        drone.dy = sign(heading.y) * drone.speed;
    }
}

/// Moves a ground enemy and bounces it off the edges of its platform.
pub fn patrol(enemy: &mut Enemy, platform: Option<&Rect>) {
    enemy.bounds.x += enemy.dx;

    let Some(platform) = platform else {
        return;
    };
    let speed = enemy.dx.abs();
    if platform.right() - enemy.bounds.width < enemy.bounds.x {
        enemy.dx = -speed;
    } else if enemy.bounds.x < platform.x {
        enemy.dx = speed;
    }
}

/// Drifts a cloud to the right, wrapping it once it leaves the level.
pub fn drift(cloud: &mut Cloud, level_width: f32) {
    cloud.position.x += cloud.dx;
    if cloud.position.x - CLOUD_WRAP_OVERSHOOT > level_width {
        cloud.position.x = CLOUD_RESTART_X;
    }
}

/// Moves the portal colour one step along its 0..=255 ramp.
pub fn oscillate(portal: &mut Portal) {
    if portal.color_rising {
        if portal.color_value < u8::MAX {
            portal.color_value += 1;
        } else {
            portal.color_rising = false;
        }
    } else if portal.color_value > 0 {
        portal.color_value -= 1;
    } else {
        portal.color_rising = true;
    }
}

fn pick_waypoint<R: Rng + ?Sized>(waypoints: &[Point], rng: &mut R) -> Option<usize> {
    if waypoints.is_empty() {
        return None;
    }
    Some(random(rng, 100.0) as usize % waypoints.len())
}

fn delta(from: Point, to: Point) -> Point {
    Point::new(to.x - from.x, to.y - from.y)
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.1), -1.0);
    }

    #[test]
    fn portal_colour_bounces_between_limits() {
        let mut portal = Portal::new(Point::new(0.0, 0.0));
        for _ in 0..255 {
            oscillate(&mut portal);
        }
        assert_eq!(portal.color_value, 255);
        assert!(portal.color_rising);

        oscillate(&mut portal);
        assert!(!portal.color_rising);
        assert_eq!(portal.color_value, 255);

        oscillate(&mut portal);
        assert_eq!(portal.color_value, 254);
    }
}
