#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generation.
//!
//! The catalogue maps a level number onto a recipe: level bounds, decoration
//! layers, one or more generated towers, a goal portal placed relative to a
//! tower descriptor, the player's start and, on later levels, drones roaming
//! between waypoints derived from the towers. Every random draw comes from
//! the caller's generator so a seed reproduces a level exactly.

mod scenery;
mod tower;

use rand::Rng;
use troposphere_core::{
    random::random, Drone, Hostile, Level, LevelBounds, Player, Point, Portal, PositionHistory,
    Rect, TowerDescriptor, Tuning,
};

pub use scenery::{add_cloud_layer, add_house_layer, add_roof};
pub use tower::{generate_tower, TowerLayout};

/// Bounds of the idle start screen.
const IDLE_BOUNDS: LevelBounds = LevelBounds::sized(4000.0, 4000.0);

/// Outcome of asking the catalogue for a level.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelSelection {
    /// The requested level, fully populated.
    Ready(Level),
    /// The requested number lies beyond the last level.
    GameFinished,
}

/// Configuration parameters required to construct the generator.
#[derive(Clone, Debug, Default)]
pub struct Config {
    tuning: Tuning,
    layout: TowerLayout,
}

impl Config {
    /// Creates a configuration from the simulation tuning and a tower layout.
    #[must_use]
    pub const fn new(tuning: Tuning, layout: TowerLayout) -> Self {
        Self { tuning, layout }
    }
}

/// Builds levels from the catalogue.
#[derive(Clone, Debug, Default)]
pub struct LevelGenerator {
    tuning: Tuning,
    layout: TowerLayout,
}

impl LevelGenerator {
    /// Creates a generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            layout: config.layout,
        }
    }

    /// Generates level `number`. Level `0` is the idle start screen with no
    /// player; numbers above [`MAX_LEVEL`](troposphere_core::MAX_LEVEL)
    /// report the game as finished.
    pub fn create_level<R: Rng + ?Sized>(&self, number: u32, rng: &mut R) -> LevelSelection {
        let level = match number {
            0 => Level::empty(0, IDLE_BOUNDS),
            1 => self.simple_level(rng),
            2 => self.two_towers(rng),
            3 => self.high_tower(rng),
            _ => return LevelSelection::GameFinished,
        };
        LevelSelection::Ready(level)
    }

    /// Appends a tower to `level`. See [`generate_tower`].
    pub fn tower<R: Rng + ?Sized>(
        &self,
        level: &mut Level,
        x: f32,
        floor_count: u32,
        rng: &mut R,
    ) -> TowerDescriptor {
        generate_tower(&self.layout, level, x, floor_count, self.history_depth(), rng)
    }

    fn history_depth(&self) -> usize {
        self.tuning.rewind.max_frames() as usize
    }

    fn place_player(&self, level: &mut Level, x: f32) {
        let y = level.bounds.height - self.tuning.player.standing_height;
        level.player = Some(Player::new(Point::new(x, y), &self.tuning));
    }

    fn add_drones<R: Rng + ?Sized>(&self, level: &mut Level, count: usize, rng: &mut R) {
        for _ in 0..count {
            let speed = random(rng, 1.0) / 2.0 + 1.0;
            let follow_distance = random(rng, 600.0) + 100.0;
            let x = random(rng, level.bounds.width);
            let y = random(rng, level.bounds.height - 500.0);
            level.hostiles.push(Hostile::Drone(Drone {
                bounds: Rect::new(x, y, Drone::SIZE, Drone::SIZE),
                speed,
                follow_distance,
                dx: 0.0,
                dy: 0.0,
                target: None,
                following: false,
                history: PositionHistory::with_capacity(self.history_depth()),
            }));
        }
    }

    fn simple_level<R: Rng + ?Sized>(&self, rng: &mut R) -> Level {
        let mut level = Level::empty(1, LevelBounds::sized(2000.0, 1500.0));

        add_house_layer(&mut level, true, rng);
        let tower = self.tower(&mut level, 1000.0, 3, rng);

        level.portals.push(Portal::new(Point::new(
            tower.x - Portal::SIZE / 2.0,
            tower.top - Portal::SIZE,
        )));
        self.place_player(&mut level, 100.0);
        level
    }

    fn two_towers<R: Rng + ?Sized>(&self, rng: &mut R) -> Level {
        let mut level = Level::empty(2, LevelBounds::sized(4000.0, 4000.0));
        let depth = self.history_depth();

        add_cloud_layer(&mut level, 2400.0, 1.0, depth, rng);
        add_cloud_layer(&mut level, 1200.0, 0.8, depth, rng);
        add_house_layer(&mut level, false, rng);
        add_roof(&mut level);

        let first = self.tower(&mut level, 1400.0, 7, rng);
        let second = self.tower(&mut level, 2500.0, 10, rng);

        level.portals.push(Portal::new(Point::new(
            second.right - second.width / 3.0,
            second.top - Portal::SIZE,
        )));
        self.place_player(&mut level, 1100.0);

        level.waypoints = vec![
            Point::new(first.left - 200.0, first.top + 300.0),
            Point::new(first.left - 200.0, first.bottom - first.height / 2.0),
            Point::new(first.x, first.top - 300.0),
            Point::new(second.left - 200.0, second.top + 300.0),
            Point::new(second.left - 200.0, second.bottom - second.height / 2.0),
            Point::new(second.x, second.top - 300.0),
            Point::new(second.right + 200.0, second.bottom - second.height / 2.0),
        ];
        self.add_drones(&mut level, 8, rng);
        level
    }

    fn high_tower<R: Rng + ?Sized>(&self, rng: &mut R) -> Level {
        let mut level = Level::empty(3, LevelBounds::sized(5000.0, 6000.0));
        let depth = self.history_depth();
        let width = level.bounds.width;

        add_cloud_layer(&mut level, 4400.0, 0.7, depth, rng);
        add_cloud_layer(&mut level, 2200.0, 0.5, depth, rng);
        add_roof(&mut level);

        let _ = self.tower(&mut level, width / 4.0 + 100.0, 8, rng);
        let central = self.tower(&mut level, width / 2.0, 15, rng);
        let _ = self.tower(&mut level, width * 3.0 / 4.0 - 100.0, 12, rng);

        level.portals.push(Portal::new(Point::new(
            central.x,
            central.top - Portal::SIZE,
        )));
        self.place_player(&mut level, 1100.0);

        level.waypoints = vec![
            Point::new(central.left - 200.0, central.top - 500.0),
            Point::new(central.left - 200.0, central.top + 1000.0),
            Point::new(central.left - 200.0, central.top + 4000.0),
            Point::new(central.right + 200.0, central.top - 300.0),
            Point::new(central.right + 200.0, central.top + 1500.0),
            Point::new(central.right + 200.0, central.top + 4500.0),
        ];
        self.add_drones(&mut level, 12, rng);
        level
    }
}
