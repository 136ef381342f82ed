#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Troposphere adapters.
//!
//! [`Scene::capture`] flattens a level and its camera into draw-ordered
//! layers: sky, back clouds, houses and roofs, platform backdrops, platforms,
//! ladders, portals, hostiles, the player and front clouds, plus the HUD.
//! Sprites are referenced by [`SpriteKey`]; image data and the actual drawing
//! belong to whichever backend consumes the scene.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::Serialize;
use troposphere_core::{
    Camera, Cloud, Decoration, EnergyTuning, Hostile, Ladder, Level, Platform, Player,
    PlayerState, PlayerTuning, Portal, Rect, Tuning,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Fixed colors of the level geometry.
pub mod palette {
    use super::Color;

    /// Platform slab.
    pub const PLATFORM: Color = Color::new(169.0 / 255.0, 169.0 / 255.0, 169.0 / 255.0, 1.0);
    /// Platform slab edge stripe.
    pub const PLATFORM_EDGE: Color = Color::new(80.0 / 255.0, 80.0 / 255.0, 80.0 / 255.0, 1.0);
    /// Floor backdrop, drawn translucent.
    pub const BACKDROP: Color = Color::new(55.0 / 255.0, 55.0 / 255.0, 75.0 / 255.0, 0.1);
    /// Ladder rails.
    pub const LADDER: Color = Color::new(100.0 / 255.0, 60.0 / 255.0, 60.0 / 255.0, 1.0);
    /// Ladder rungs.
    pub const LADDER_RUNG: Color = Color::new(80.0 / 255.0, 20.0 / 255.0, 20.0 / 255.0, 1.0);
    /// Roof strip along the level floor.
    pub const ROOF: Color = PLATFORM;
    /// Cloud fill.
    pub const CLOUD: Color = Color::new(1.0, 1.0, 1.0, 1.0);
}

/// Portal fill opacity.
const PORTAL_ALPHA: f32 = 0.7;
/// Radius below which the small cloud outline is drawn.
const LARGE_CLOUD_RADIUS: f32 = 45.0;
/// Vertical distance between ladder rungs.
const LADDER_STEP_GAP: f32 = 15.0;

/// Image selectors understood by sprite-based backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SpriteKey {
    /// Player upright, feet together.
    PlayerStanding,
    /// Player upright, left foot forward.
    PlayerLeftFoot,
    /// Player on a ladder.
    PlayerVertical,
    /// Player on a ladder, left foot raised.
    PlayerVerticalLeftFoot,
    /// Ground enemy.
    Enemy,
    /// Ground enemy flashing after a hit.
    EnemyHit,
    /// Drone roaming between waypoints.
    Drone,
    /// Drone chasing the player.
    DroneFollow,
    /// Background house.
    House,
}

/// Image placed inside a world-space box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpritePresentation {
    /// Image to draw.
    pub key: SpriteKey,
    /// World-space box the image is fitted into.
    pub bounds: Rect,
    /// Mirror horizontally.
    pub mirrored: bool,
    /// Rotation in radians around the box origin.
    pub rotation: f32,
    /// Uniform scale applied before rotation.
    pub scale: f32,
    /// Shake the sprite by a few random pixels.
    pub jitter: bool,
}

impl SpritePresentation {
    /// Creates an unrotated, unscaled sprite.
    #[must_use]
    pub const fn new(key: SpriteKey, bounds: Rect) -> Self {
        Self {
            key,
            bounds,
            mirrored: false,
            rotation: 0.0,
            scale: 1.0,
            jitter: false,
        }
    }
}

/// Solid rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FillPresentation {
    /// World-space rectangle.
    pub bounds: Rect,
    /// Fill color.
    pub color: Color,
}

/// Ladder drawn as alternating rails and rungs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LadderPresentation {
    /// World-space extent.
    pub bounds: Rect,
    /// Vertical distance between rungs.
    pub step_gap: f32,
}

/// Cloud outline anchored at its top-left curve start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CloudPresentation {
    /// World-space anchor.
    pub anchor: Vec2,
    /// Draw the larger outline.
    pub large: bool,
    /// Fill color including opacity.
    pub color: Color,
}

/// Colour stop of the vertical sky gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the level height in `[0, 1]`.
    pub offset: f32,
    /// Color at the stop.
    pub color: Color,
}

/// Mapping from world space to the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraPresentation {
    /// World point shown at the centre of the surface.
    pub center: Vec2,
    /// Screen units per world unit.
    pub zoom: f32,
    /// Size of the drawing surface.
    pub viewport: Vec2,
    /// Outline the level bounds; set while the whole level is framed.
    pub show_level_border: bool,
}

impl CameraPresentation {
    /// Captures the camera state.
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            center: Vec2::new(camera.position.x, camera.position.y),
            zoom: camera.zoom,
            viewport: Vec2::new(camera.viewport_width, camera.viewport_height),
            show_level_border: camera.target.is_none(),
        }
    }

    /// Converts a world position into surface coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.center) * self.zoom + self.viewport / 2.0
    }
}

/// Energy meter colour band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EnergyBand {
    /// Plenty left.
    Normal,
    /// Below the low threshold.
    Low,
    /// Below the very low threshold.
    VeryLow,
}

impl EnergyBand {
    /// Classifies an energy amount.
    #[must_use]
    pub fn classify(energy: u32, tuning: &EnergyTuning) -> Self {
        if energy < tuning.very_low_threshold {
            Self::VeryLow
        } else if energy < tuning.low_threshold {
            Self::Low
        } else {
            Self::Normal
        }
    }

    /// Bar fill color for the band.
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::Normal => Color::from_rgb_u8(0, 128, 0),
            Self::Low => Color::from_rgb_u8(255, 165, 0),
            Self::VeryLow => Color::from_rgb_u8(255, 0, 0),
        }
    }
}

/// Status overlay for a level with a player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Hud {
    /// Level number shown in the corner.
    pub level: u32,
    /// Energy as a fraction of the maximum.
    pub energy_fraction: f32,
    /// Energy bar colour band.
    pub energy_band: EnergyBand,
    /// Anti-gravity indicator.
    pub anti_gravity: bool,
    /// Time travel indicator.
    pub time_travelling: bool,
    /// The player died; the shell offers a restart.
    pub failed: bool,
    /// The player reached the portal.
    pub finished: bool,
}

impl Hud {
    /// Builds the overlay for `player` in `level`.
    #[must_use]
    pub fn new(level: &Level, player: &Player, tuning: &EnergyTuning) -> Self {
        let energy_fraction = if tuning.max == 0 {
            0.0
        } else {
            (player.energy as f32 / tuning.max as f32).clamp(0.0, 1.0)
        };
        Self {
            level: level.number,
            energy_fraction,
            energy_band: EnergyBand::classify(player.energy, tuning),
            anti_gravity: player.anti_gravity,
            time_travelling: player.is_time_travelling,
            failed: player.is_dead(),
            finished: level.finished,
        }
    }
}

/// Describes everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    /// World-to-surface mapping.
    pub camera: CameraPresentation,
    /// Extent of the level in world units.
    pub level_size: Vec2,
    /// Vertical background gradient.
    pub sky: Vec<GradientStop>,
    /// Clouds behind the level geometry.
    pub clouds_back: Vec<CloudPresentation>,
    /// House silhouettes.
    pub houses: Vec<SpritePresentation>,
    /// Roof strips.
    pub roofs: Vec<FillPresentation>,
    /// Translucent floor backdrops.
    pub backdrops: Vec<FillPresentation>,
    /// Collidable platforms.
    pub platforms: Vec<FillPresentation>,
    /// Ladders.
    pub ladders: Vec<LadderPresentation>,
    /// Goal portals.
    pub portals: Vec<FillPresentation>,
    /// Ground enemies and drones.
    pub hostiles: Vec<SpritePresentation>,
    /// The player, unless absent or hidden.
    pub player: Option<SpritePresentation>,
    /// Clouds in front of everything else.
    pub clouds_front: Vec<CloudPresentation>,
    /// Status overlay, absent on the idle screen.
    pub hud: Option<Hud>,
}

impl Scene {
    /// Captures the current frame.
    #[must_use]
    pub fn capture(level: &Level, camera: &Camera, tuning: &Tuning) -> Self {
        let mut houses = Vec::new();
        let mut roofs = Vec::new();
        for decoration in &level.decorations {
            match decoration {
                Decoration::House(bounds) => {
                    houses.push(SpritePresentation::new(SpriteKey::House, *bounds));
                }
                Decoration::Roof(bounds) => roofs.push(FillPresentation {
                    bounds: *bounds,
                    color: palette::ROOF,
                }),
            }
        }

        Self {
            camera: CameraPresentation::from_camera(camera),
            level_size: Vec2::new(level.bounds.width, level.bounds.height),
            sky: sky_gradient(level.number),
            clouds_back: level.clouds_back.iter().map(cloud_presentation).collect(),
            houses,
            roofs,
            backdrops: level
                .platform_backgrounds
                .iter()
                .map(|backdrop| platform_fill(backdrop, palette::BACKDROP))
                .collect(),
            platforms: level
                .platforms
                .iter()
                .map(|platform| platform_fill(platform, palette::PLATFORM))
                .collect(),
            ladders: level.ladders.iter().map(ladder_presentation).collect(),
            portals: level.portals.iter().map(portal_fill).collect(),
            hostiles: level.hostiles.iter().map(hostile_sprite).collect(),
            player: level
                .player
                .as_ref()
                .and_then(|player| player_sprite(player, &tuning.player)),
            clouds_front: level.clouds_front.iter().map(cloud_presentation).collect(),
            hud: level
                .player
                .as_ref()
                .map(|player| Hud::new(level, player, &tuning.energy)),
        }
    }
}

/// Picks the player's image and transform, or `None` once hidden.
#[must_use]
pub fn player_sprite(player: &Player, tuning: &PlayerTuning) -> Option<SpritePresentation> {
    if player.hidden {
        return None;
    }

    let left_foot = player.walk_counter >= tuning.walk_cycle;
    let upright = if left_foot {
        SpriteKey::PlayerLeftFoot
    } else {
        SpriteKey::PlayerStanding
    };
    let mut sprite = SpritePresentation::new(upright, player.body);
    sprite.jitter = player.is_time_travelling;

    if player.state == PlayerState::Swirling {
        sprite.scale = 0.6 + player.swirl_angle.sin() * 0.4;
        sprite.rotation = player.swirl_angle;
    } else if player.falling_to_ground {
        sprite.rotation = -FRAC_PI_2;
    } else if player.state == PlayerState::Climbing {
        sprite.key = if left_foot {
            SpriteKey::PlayerVerticalLeftFoot
        } else {
            SpriteKey::PlayerVertical
        };
    } else {
        sprite.mirrored = player.facing_left;
    }

    Some(sprite)
}

/// Picks the image for a hostile.
#[must_use]
pub fn hostile_sprite(hostile: &Hostile) -> SpritePresentation {
    match hostile {
        Hostile::Patroller(enemy) => {
            let key = if enemy.hit {
                SpriteKey::EnemyHit
            } else {
                SpriteKey::Enemy
            };
            SpritePresentation::new(key, enemy.bounds)
        }
        Hostile::Drone(drone) => {
            let key = if drone.following {
                SpriteKey::DroneFollow
            } else {
                SpriteKey::Drone
            };
            SpritePresentation::new(key, drone.bounds)
        }
    }
}

/// Portal fill: `rgb(255, 150, phase)` at 70% opacity.
#[must_use]
pub fn portal_color(portal: &Portal) -> Color {
    Color::from_rgb_u8(255, 150, portal.color_value).with_alpha(PORTAL_ALPHA)
}

/// Sky gradient for a level number; the idle screen has none.
#[must_use]
pub fn sky_gradient(number: u32) -> Vec<GradientStop> {
    let stops: &[(f32, (u8, u8, u8))] = match number {
        1 => &[(0.0, (80, 80, 200)), (1.0, (100, 100, 255))],
        2 => &[(0.0, (255, 200, 0)), (1.0, (80, 80, 200))],
        3 => &[(0.0, (0, 0, 25)), (0.5, (255, 0, 0)), (1.0, (255, 200, 0))],
        _ => &[],
    };
    stops
        .iter()
        .map(|&(offset, (red, green, blue))| GradientStop {
            offset,
            color: Color::from_rgb_u8(red, green, blue),
        })
        .collect()
}

fn platform_fill(platform: &Platform, color: Color) -> FillPresentation {
    FillPresentation {
        bounds: platform.bounds,
        color,
    }
}

fn portal_fill(portal: &Portal) -> FillPresentation {
    FillPresentation {
        bounds: portal.bounds,
        color: portal_color(portal),
    }
}

fn ladder_presentation(ladder: &Ladder) -> LadderPresentation {
    LadderPresentation {
        bounds: ladder.bounds,
        step_gap: LADDER_STEP_GAP,
    }
}

fn cloud_presentation(cloud: &Cloud) -> CloudPresentation {
    CloudPresentation {
        anchor: Vec2::new(cloud.position.x, cloud.position.y),
        large: cloud.radius >= LARGE_CLOUD_RADIUS,
        color: palette::CLOUD.with_alpha(cloud.opacity),
    }
}
