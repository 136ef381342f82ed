#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera controller: follows the player inside the level bounds, frames the
//! whole level on request, and applies decaying shake impulses.

use rand::Rng;
use troposphere_core::{random::random, Camera, CameraTarget, CameraTuning, LevelBounds, Rect};

/// Configuration parameters required to construct the camera controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tick_seconds: f32,
}

impl Config {
    /// Creates a configuration for a simulation advancing `tick_seconds` per tick.
    #[must_use]
    pub const fn new(tick_seconds: f32) -> Self {
        Self { tick_seconds }
    }

    /// Extracts the relevant knobs from the camera tuning.
    #[must_use]
    pub fn from_tuning(tuning: &CameraTuning) -> Self {
        Self::new(tuning.tick_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_tuning(&CameraTuning::default())
    }
}

/// Pure system driving a [`Camera`] once per tick.
#[derive(Clone, Debug, Default)]
pub struct CameraController {
    config: Config,
}

impl CameraController {
    /// Creates the controller using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Advances the camera by one tick.
    ///
    /// `target` is the followed entity's collision box; it is ignored unless
    /// the camera is bound to a target.
    pub fn update<R: Rng + ?Sized>(
        &self,
        camera: &mut Camera,
        bounds: &LevelBounds,
        target: Option<Rect>,
        rng: &mut R,
    ) {
        if let (Some(_), Some(target)) = (camera.target, target) {
            fit_zoom(camera, bounds);
            track(camera, bounds, &target);
        }

        self.apply_shake(camera, rng);
    }

    fn apply_shake<R: Rng + ?Sized>(&self, camera: &mut Camera, rng: &mut R) {
        let power = camera.shake_power;
        if power <= 0.0 {
            return;
        }

        camera.position.x += random(rng, power * 2.0) - power;
        camera.position.y += random(rng, power * 2.0) - power;
        camera.shake_power = (power - camera.shake_decay * self.config.tick_seconds).max(0.0);
    }
}

/// Binds the camera to the player and resets its zoom.
pub fn follow(camera: &mut Camera) {
    camera.zoom = 1.0;
    camera.target = Some(CameraTarget::Player);
}

/// Unbinds the camera and frames the whole level, picking the axis whose fit
/// keeps the entire level on screen.
pub fn zoom_to_level(camera: &mut Camera, bounds: &LevelBounds) {
    camera.target = None;
    camera.position = bounds.center();

    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    let level_aspect = bounds.width / bounds.height;
    let viewport_aspect = camera.viewport_width / camera.viewport_height;
    camera.zoom = if level_aspect >= viewport_aspect {
        camera.viewport_width / bounds.width
    } else {
        camera.viewport_height / bounds.height
    };
}

/// Starts a shake impulse that decays linearly to zero over `length` seconds.
pub fn shake(camera: &mut Camera, power: f32, length: f32) {
    camera.shake_power = power.max(0.0);
    camera.shake_decay = if length > 0.0 {
        camera.shake_power / length
    } else {
        f32::INFINITY
    };
}

fn fit_zoom(camera: &mut Camera, bounds: &LevelBounds) {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    let zoomed_width = bounds.width * camera.zoom;
    let zoomed_height = bounds.height * camera.zoom;
    if zoomed_width < camera.viewport_width || zoomed_height < camera.viewport_height {
        camera.zoom = (camera.viewport_width / bounds.width)
            .max(camera.viewport_height / bounds.height);
    }
}

// The follow point is the target's bottom-right corner.
fn track(camera: &mut Camera, bounds: &LevelBounds, target: &Rect) {
    let half_width = camera.viewport_width / camera.zoom / 2.0;
    let half_height = camera.viewport_height / camera.zoom / 2.0;

    let mut x = target.right();
    let mut y = target.bottom();

    if x - half_width < bounds.left {
        x = bounds.left + half_width;
    } else if x + half_width > bounds.width {
        x = bounds.width - half_width;
    }

    if y - half_height < bounds.top {
        y = bounds.top + half_height;
    } else if y + half_height > bounds.height {
        y = bounds.height - half_height;
    }

    camera.position.x = x;
    camera.position.y = y;
}
