//! Plain entity records owned by a [`Level`].
//!
//! Behaviour lives in the systems crates; these types only carry state and
//! the capability traits needed for collision tests and rewinding.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Collidable, Margins, Point, PositionHistory, Positioned, Rect, Rewindable, Tuning};

/// Player state machine positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    /// Standing on a platform or on the level floor.
    #[default]
    OnPlatform,
    /// Airborne and subject to gravity.
    Falling,
    /// Holding on to a ladder.
    Climbing,
    /// Terminal: hit the ground after a deadly fall.
    Dead,
    /// Terminal: spinning into the portal after finishing the level.
    Swirling,
}

impl PlayerState {
    /// Reports whether no further physics runs in this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, PlayerState::Dead | PlayerState::Swirling)
    }
}

/// The controllable character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Collision box. Width and height swap while falling to the ground.
    pub body: Rect,
    /// Knock-back velocity from enemy hits.
    pub x_vel: f32,
    /// Vertical velocity from jumping and gravity.
    pub y_vel: f32,
    /// Current state machine position.
    pub state: PlayerState,
    /// Remaining energy.
    pub energy: u32,
    /// Consecutive rewind depth currently used.
    pub time_travel_frames: u32,
    /// Anti-gravity active this tick.
    pub anti_gravity: bool,
    /// Rewinding this tick.
    pub is_time_travelling: bool,
    /// Committed to a fatal fall.
    pub falling_to_ground: bool,
    /// Removed from view after the finish swirl.
    pub hidden: bool,
    /// Last horizontal movement went left.
    pub facing_left: bool,
    /// Walk animation counter.
    pub walk_counter: u32,
    /// Up key must be released before it can jump again.
    pub stop_climbing: bool,
    /// Last time a supporting platform was found.
    pub latest_on_platform: Option<Duration>,
    /// Time the finish swirl started.
    pub swirl_started: Option<Duration>,
    /// Swirl animation angle in radians.
    pub swirl_angle: f32,
    /// Positions recorded for rewinding.
    pub history: PositionHistory,
}

impl Player {
    /// Creates a standing player with full energy at the given top-left corner.
    #[must_use]
    pub fn new(position: Point, tuning: &Tuning) -> Self {
        Self {
            body: Rect::new(
                position.x,
                position.y,
                tuning.player.standing_width,
                tuning.player.standing_height,
            ),
            x_vel: 0.0,
            y_vel: 0.0,
            state: PlayerState::OnPlatform,
            energy: tuning.energy.max,
            time_travel_frames: 0,
            anti_gravity: false,
            is_time_travelling: false,
            falling_to_ground: false,
            hidden: false,
            facing_left: false,
            walk_counter: 0,
            stop_climbing: false,
            latest_on_platform: None,
            swirl_started: None,
            swirl_angle: 0.0,
            history: PositionHistory::with_capacity(tuning.rewind.max_frames() as usize),
        }
    }

    /// Reports whether the player died.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    /// Reports whether the finish swirl is playing.
    #[must_use]
    pub fn is_swirling(&self) -> bool {
        self.state == PlayerState::Swirling
    }

    /// Reports whether the player's feet are within `margin` of the level floor.
    #[must_use]
    pub fn is_on_ground(&self, bounds: &LevelBounds, margin: f32) -> bool {
        self.body.bottom() > bounds.height - margin
    }
}

impl Positioned for Player {
    fn position(&self) -> Point {
        self.body.origin()
    }

    fn set_position(&mut self, position: Point) {
        self.body.move_to(position);
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Rect {
        self.body
    }
}

impl Rewindable for Player {
    fn history_mut(&mut self) -> &mut PositionHistory {
        &mut self.history
    }

    fn history(&self) -> &PositionHistory {
        &self.history
    }
}

/// Horizontal slab the player can stand on, or its decorative backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Occupied rectangle.
    pub bounds: Rect,
    /// Decorative backdrop that never collides.
    pub is_background: bool,
}

impl Platform {
    /// Creates a collidable platform.
    #[must_use]
    pub const fn solid(bounds: Rect) -> Self {
        Self {
            bounds,
            is_background: false,
        }
    }

    /// Creates a decorative backdrop.
    #[must_use]
    pub const fn background(bounds: Rect) -> Self {
        Self {
            bounds,
            is_background: true,
        }
    }
}

impl Collidable for Platform {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Index of a platform inside [`Level::platforms`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(u32);

impl PlatformId {
    /// Creates an identifier from a platform index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric index of the platform.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Climbable ladder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    /// Occupied rectangle.
    pub bounds: Rect,
}

impl Collidable for Ladder {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Ground enemy patrolling a single platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Occupied rectangle.
    pub bounds: Rect,
    /// Horizontal velocity per tick.
    pub dx: f32,
    /// Platform the patrol is bound to.
    pub platform: PlatformId,
    /// Showing the hit sprite.
    pub hit: bool,
    /// Positions recorded for rewinding.
    pub history: PositionHistory,
}

impl Enemy {
    /// Enemy width.
    pub const WIDTH: f32 = 30.0;
    /// Enemy height.
    pub const HEIGHT: f32 = 80.0;
    const MARGINS: Margins = Margins::new(10.0, 20.0);
}

impl Collidable for Enemy {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn collision_margins(&self) -> Margins {
        Self::MARGINS
    }
}

/// Flying enemy that roams between waypoints and chases a nearby player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    /// Occupied rectangle.
    pub bounds: Rect,
    /// Per-axis speed.
    pub speed: f32,
    /// Chases the player when closer than this.
    pub follow_distance: f32,
    /// Horizontal velocity chosen last tick.
    pub dx: f32,
    /// Vertical velocity chosen last tick.
    pub dy: f32,
    /// Index into [`Level::waypoints`] of the current goal.
    pub target: Option<usize>,
    /// Chasing the player.
    pub following: bool,
    /// Positions recorded for rewinding.
    pub history: PositionHistory,
}

impl Drone {
    /// Drone side length.
    pub const SIZE: f32 = 60.0;
    const MARGINS: Margins = Margins::new(20.0, 20.0);
}

impl Collidable for Drone {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn collision_margins(&self) -> Margins {
        Self::MARGINS
    }
}

/// Anything that hurts the player on contact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Hostile {
    /// Ground enemy.
    Patroller(Enemy),
    /// Flying drone.
    Drone(Drone),
}

impl Positioned for Hostile {
    fn position(&self) -> Point {
        self.bounds().origin()
    }

    fn set_position(&mut self, position: Point) {
        match self {
            Hostile::Patroller(enemy) => enemy.bounds.move_to(position),
            Hostile::Drone(drone) => drone.bounds.move_to(position),
        }
    }
}

impl Collidable for Hostile {
    fn bounds(&self) -> Rect {
        match self {
            Hostile::Patroller(enemy) => enemy.bounds(),
            Hostile::Drone(drone) => drone.bounds(),
        }
    }

    fn collision_margins(&self) -> Margins {
        match self {
            Hostile::Patroller(enemy) => enemy.collision_margins(),
            Hostile::Drone(drone) => drone.collision_margins(),
        }
    }
}

impl Rewindable for Hostile {
    fn history_mut(&mut self) -> &mut PositionHistory {
        match self {
            Hostile::Patroller(enemy) => &mut enemy.history,
            Hostile::Drone(drone) => &mut drone.history,
        }
    }

    fn history(&self) -> &PositionHistory {
        match self {
            Hostile::Patroller(enemy) => &enemy.history,
            Hostile::Drone(drone) => &drone.history,
        }
    }
}

/// Goal that finishes the level when touched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    /// Occupied rectangle.
    pub bounds: Rect,
    /// Blue channel of the oscillating colour.
    pub color_value: u8,
    /// Colour currently counting up.
    pub color_rising: bool,
}

impl Portal {
    /// Portal side length.
    pub const SIZE: f32 = 200.0;

    /// Creates a portal with its colour phase at zero.
    #[must_use]
    pub const fn new(origin: Point) -> Self {
        Self {
            bounds: Rect::new(origin.x, origin.y, Self::SIZE, Self::SIZE),
            color_value: 0,
            color_rising: true,
        }
    }
}

impl Collidable for Portal {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn collision_margins(&self) -> Margins {
        Margins::proportional(self.bounds.width, self.bounds.height, 3.0 / 8.0)
    }
}

/// Parallax layer a cloud is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudLayer {
    /// Behind the level geometry.
    Back,
    /// In front of the player.
    Front,
}

/// Drifting decorative cloud.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    /// Anchor point of the cloud outline.
    pub position: Point,
    /// Horizontal drift per tick.
    pub dx: f32,
    /// Parallax layer.
    pub layer: CloudLayer,
    /// Draw opacity in `[0, 1]`.
    pub opacity: f32,
    /// Size selector for the outline.
    pub radius: f32,
    /// Positions recorded for rewinding.
    pub history: PositionHistory,
}

impl Positioned for Cloud {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

impl Rewindable for Cloud {
    fn history_mut(&mut self) -> &mut PositionHistory {
        &mut self.history
    }

    fn history(&self) -> &PositionHistory {
        &self.history
    }
}

/// Static background scenery. Never collides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Decoration {
    /// City block silhouette.
    House(Rect),
    /// Strip covering the bottom of the level.
    Roof(Rect),
}

/// Extent of a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    /// Leftmost coordinate.
    pub left: f32,
    /// Topmost coordinate.
    pub top: f32,
    /// Horizontal extent; also the rightmost coordinate.
    pub width: f32,
    /// Vertical extent; also the floor coordinate.
    pub height: f32,
}

impl LevelBounds {
    /// Bounds anchored at the origin with the given size.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Midpoint of the level.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width / 2.0,
            self.top + self.height / 2.0,
        )
    }
}

/// Bounding box of a generated tower, used to place portals and waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerDescriptor {
    /// Horizontal centre.
    pub x: f32,
    /// Floor width.
    pub width: f32,
    /// Total height of all floors.
    pub height: f32,
    /// Top of the highest floor.
    pub top: f32,
    /// Bottom of the tower, the level floor.
    pub bottom: f32,
    /// Left edge.
    pub left: f32,
    /// Right edge.
    pub right: f32,
}

/// Entity the camera follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraTarget {
    /// The level's player.
    Player,
}

/// Viewpoint mapping level space onto the drawing surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Centre of the view in level space.
    pub position: Point,
    /// Scale from level units to surface pixels.
    pub zoom: f32,
    /// Followed entity, if any.
    pub target: Option<CameraTarget>,
    /// Current shake amplitude.
    pub shake_power: f32,
    /// Amplitude lost per second.
    pub shake_decay: f32,
    /// Width of the drawing surface.
    pub viewport_width: f32,
    /// Height of the drawing surface.
    pub viewport_height: f32,
}

impl Camera {
    /// Creates an unbound camera at the origin for a surface of the given size.
    #[must_use]
    pub const fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Point::new(0.0, 0.0),
            zoom: 1.0,
            target: None,
            shake_power: 0.0,
            shake_decay: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Level-space rectangle currently visible, ignoring shake.
    #[must_use]
    pub fn visible_area(&self) -> Rect {
        let width = self.viewport_width / self.zoom;
        let height = self.viewport_height / self.zoom;
        Rect::new(
            self.position.x - width / 2.0,
            self.position.y - height / 2.0,
            width,
            height,
        )
    }
}

/// A playable stage and everything in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Catalogue number.
    pub number: u32,
    /// Extent.
    pub bounds: LevelBounds,
    /// The player touched a portal.
    pub finished: bool,
    /// Collidable platforms.
    pub platforms: Vec<Platform>,
    /// Decorative floor backdrops.
    pub platform_backgrounds: Vec<Platform>,
    /// Ladders.
    pub ladders: Vec<Ladder>,
    /// Ground enemies and drones.
    pub hostiles: Vec<Hostile>,
    /// Clouds drawn behind the geometry.
    pub clouds_back: Vec<Cloud>,
    /// Clouds drawn in front of the player.
    pub clouds_front: Vec<Cloud>,
    /// Houses and roofs.
    pub decorations: Vec<Decoration>,
    /// Goal portals.
    pub portals: Vec<Portal>,
    /// Points drones roam between, shared by every drone.
    pub waypoints: Vec<Point>,
    /// The player; absent on the idle start screen.
    pub player: Option<Player>,
}

impl Level {
    /// Creates an empty level with the given number and bounds.
    #[must_use]
    pub fn empty(number: u32, bounds: LevelBounds) -> Self {
        Self {
            number,
            bounds,
            finished: false,
            platforms: Vec::new(),
            platform_backgrounds: Vec::new(),
            ladders: Vec::new(),
            hostiles: Vec::new(),
            clouds_back: Vec::new(),
            clouds_front: Vec::new(),
            decorations: Vec::new(),
            portals: Vec::new(),
            waypoints: Vec::new(),
            player: None,
        }
    }

    /// Reports whether the player died.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.player.as_ref().is_some_and(Player::is_dead)
    }

    /// Looks up a platform by identifier.
    #[must_use]
    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.get(id.get() as usize)
    }
}
