//! Tower generator: stacks of solid or split floors with ladders and patrols.

use rand::{seq::index, Rng};
use troposphere_core::{
    random::{chance, random, random_int},
    Enemy, Hostile, Ladder, Level, Platform, PlatformId, PositionHistory, Rect, TowerDescriptor,
};

/// Geometry and odds used when stacking tower floors.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerLayout {
    /// Width of a full floor.
    pub floor_width: f32,
    /// Vertical distance between floors.
    pub floor_height: f32,
    /// Thickness of a collidable platform.
    pub platform_thickness: f32,
    /// Height of the decorative backdrop behind each floor.
    pub background_height: f32,
    /// Odds that a floor is solid rather than split.
    pub solid_probability: f32,
    /// Odds that a solid floor carries a patrolling enemy.
    pub enemy_probability: f32,
    /// Horizontal slots per platform that ladders are centred in.
    pub ladder_segments: usize,
    /// Ladder width.
    pub ladder_width: f32,
    /// Fewest ladders on a solid floor.
    pub min_ladders: u32,
    /// Most ladders on a solid floor.
    pub max_ladders: u32,
    /// Upper bound of the random part of an enemy's speed.
    pub enemy_speed_spread: f32,
    /// Slowest enemy speed.
    pub enemy_min_speed: f32,
}

impl Default for TowerLayout {
    fn default() -> Self {
        Self {
            floor_width: 800.0,
            floor_height: 300.0,
            platform_thickness: 20.0,
            background_height: 400.0,
            solid_probability: 0.8,
            enemy_probability: 0.7,
            ladder_segments: 6,
            ladder_width: 30.0,
            min_ladders: 1,
            max_ladders: 3,
            enemy_speed_spread: 6.0,
            enemy_min_speed: 1.0,
        }
    }
}

/// Appends a tower centred on `x` with `floor_count` floors to `level`.
///
/// Floors are stacked from the level floor upwards. Two split floors are
/// never adjacent; every solid floor gets at least one ladder and every
/// split half exactly one.
pub fn generate_tower<R: Rng + ?Sized>(
    layout: &TowerLayout,
    level: &mut Level,
    x: f32,
    floor_count: u32,
    history_depth: usize,
    rng: &mut R,
) -> TowerDescriptor {
    let level_height = level.bounds.height;
    let floor_left = x - layout.floor_width / 2.0;
    let floor_right = floor_left + layout.floor_width;
    let mut previous_split = false;

    for floor in 0..floor_count {
        let floor_top = level_height - (floor + 1) as f32 * layout.floor_height;

        if previous_split || chance(rng, layout.solid_probability) {
            let bounds = Rect::new(
                floor_left,
                floor_top,
                layout.floor_width,
                layout.platform_thickness,
            );
            let platform = push_platform(level, bounds);

            let ladder_count = random_int(
                rng,
                layout.min_ladders as f32,
                (layout.max_ladders + 1) as f32,
            )
            .max(1) as usize;
            add_ladders(layout, level, &bounds, ladder_count, rng);

            if chance(rng, layout.enemy_probability) {
                let enemy = Enemy {
                    bounds: Rect::new(
                        floor_left + random(rng, layout.floor_width - Enemy::WIDTH),
                        floor_top - Enemy::HEIGHT,
                        Enemy::WIDTH,
                        Enemy::HEIGHT,
                    ),
                    dx: random(rng, layout.enemy_speed_spread) + layout.enemy_min_speed,
                    platform,
                    hit: false,
                    history: PositionHistory::with_capacity(history_depth),
                };
                level.hostiles.push(Hostile::Patroller(enemy));
            }
            previous_split = false;
        } else {
            let half_width = layout.floor_width / 3.0;
            for half_left in [floor_left, floor_right - half_width] {
                let bounds = Rect::new(half_left, floor_top, half_width, layout.platform_thickness);
                let _ = push_platform(level, bounds);
                add_ladders(layout, level, &bounds, 1, rng);
            }
            previous_split = true;
        }

        level.platform_backgrounds.push(Platform::background(Rect::new(
            floor_left,
            floor_top,
            layout.floor_width,
            layout.background_height,
        )));
    }

    let height = floor_count as f32 * layout.floor_height;
    TowerDescriptor {
        x,
        width: layout.floor_width,
        height,
        top: level_height - height,
        bottom: level_height,
        left: floor_left,
        right: floor_right,
    }
}

fn push_platform(level: &mut Level, bounds: Rect) -> PlatformId {
    let id = PlatformId::new(level.platforms.len() as u32);
    level.platforms.push(Platform::solid(bounds));
    id
}

// Ladders hang from the platform down to the floor below, each centred in a
// distinct segment so they never overlap.
fn add_ladders<R: Rng + ?Sized>(
    layout: &TowerLayout,
    level: &mut Level,
    platform: &Rect,
    count: usize,
    rng: &mut R,
) {
    let segments = layout.ladder_segments.max(1);
    let segment_width = platform.width / segments as f32;
    let inset = ((segment_width - layout.ladder_width) / 2.0).max(0.0);

    for segment in index::sample(rng, segments, count.min(segments)) {
        level.ladders.push(Ladder {
            bounds: Rect::new(
                platform.x + segment as f32 * segment_width + inset,
                platform.y,
                layout.ladder_width.min(segment_width),
                layout.floor_height,
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use troposphere_core::LevelBounds;

    #[test]
    fn descriptor_matches_floor_geometry() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut level = Level::empty(1, LevelBounds::sized(2000.0, 1500.0));
        let tower = generate_tower(&TowerLayout::default(), &mut level, 1000.0, 3, 120, &mut rng);

        assert_eq!(
            tower,
            TowerDescriptor {
                x: 1000.0,
                width: 800.0,
                height: 900.0,
                top: 600.0,
                bottom: 1500.0,
                left: 600.0,
                right: 1400.0,
            }
        );
    }

    #[test]
    fn split_halves_are_a_third_wide() {
        let layout = TowerLayout {
            solid_probability: 0.0,
            ..TowerLayout::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut level = Level::empty(1, LevelBounds::sized(2000.0, 1500.0));
        let _ = generate_tower(&layout, &mut level, 1000.0, 1, 120, &mut rng);

        let widths: Vec<f32> = level.platforms.iter().map(|p| p.bounds.width).collect();
        assert_eq!(widths, vec![800.0 / 3.0, 800.0 / 3.0]);
        assert!((level.platforms[1].bounds.right() - 1400.0).abs() < 1e-3);
        assert_eq!(level.ladders.len(), 2);
        assert!(level.hostiles.is_empty());
    }
}
