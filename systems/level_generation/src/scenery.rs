//! Decorative layers: parallax clouds, house silhouettes and the roof strip.

use rand::Rng;
use troposphere_core::{
    random::random, Cloud, CloudLayer, Decoration, Level, Point, PositionHistory, Rect,
};

const CLOUDS_PER_LAYER: usize = 20;
const CLOUD_VERTICAL_SPREAD: f32 = 200.0;
const HOUSE_WIDTH: f32 = 80.0;
const HOUSE_MAX_HEIGHT: f32 = 150.0;
const HOUSE_HEIGHT_SPREAD: f32 = 100.0;
const HOUSE_SPACING: f32 = 100.0;
const ROOF_HEIGHT: f32 = 30.0;

/// Adds a band of clouds around height `y` to both parallax layers.
pub fn add_cloud_layer<R: Rng + ?Sized>(
    level: &mut Level,
    y: f32,
    opacity: f32,
    history_depth: usize,
    rng: &mut R,
) {
    for _ in 0..CLOUDS_PER_LAYER {
        let cloud = cloud(level.bounds.width, y, CloudLayer::Back, opacity, history_depth, rng);
        level.clouds_back.push(cloud);
    }
    for _ in 0..CLOUDS_PER_LAYER {
        let cloud = cloud(level.bounds.width, y, CloudLayer::Front, opacity, history_depth, rng);
        level.clouds_front.push(cloud);
    }
}

fn cloud<R: Rng + ?Sized>(
    level_width: f32,
    y: f32,
    layer: CloudLayer,
    opacity: f32,
    history_depth: usize,
    rng: &mut R,
) -> Cloud {
    let x = random(rng, level_width * 5.0 / 4.0) - level_width / 4.0;
    let y = y + random(rng, CLOUD_VERTICAL_SPREAD) - CLOUD_VERTICAL_SPREAD / 2.0;
    let (opacity, base_speed) = match layer {
        CloudLayer::Back => (0.95 * opacity, 0.07),
        CloudLayer::Front => (0.7 * opacity, 0.05),
    };
    let dx = base_speed + random(rng, 0.1);
    let radius = 20.0 + random(rng, 1.0) * random(rng, 1.0) * 70.0;

    Cloud {
        position: Point::new(x, y),
        dx,
        layer,
        opacity,
        radius,
        history: PositionHistory::with_capacity(history_depth),
    }
}

/// Lines the bottom of the level with houses, optionally stacked two high.
pub fn add_house_layer<R: Rng + ?Sized>(level: &mut Level, stacked: bool, rng: &mut R) {
    let floor = level.bounds.height;
    let count = (level.bounds.width / 10.0).max(0.0) as usize;

    for index in 0..count {
        let height = HOUSE_MAX_HEIGHT - random(rng, HOUSE_HEIGHT_SPREAD);
        let x = index as f32 * random(rng, HOUSE_SPACING);
        let house = Rect::new(x, floor - height, HOUSE_WIDTH, height);
        level.decorations.push(Decoration::House(house));

        if stacked {
            let upper_height = HOUSE_MAX_HEIGHT - random(rng, HOUSE_HEIGHT_SPREAD);
            level.decorations.push(Decoration::House(Rect::new(
                x,
                house.y - house.height,
                HOUSE_WIDTH,
                upper_height,
            )));
        }
    }
}

/// Covers the bottom of the level with a flat roof strip.
pub fn add_roof(level: &mut Level) {
    let bounds = level.bounds;
    level.decorations.push(Decoration::Roof(Rect::new(
        bounds.left,
        bounds.height - ROOF_HEIGHT,
        bounds.width,
        ROOF_HEIGHT,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use troposphere_core::LevelBounds;

    #[test]
    fn cloud_layer_fills_both_planes() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut level = Level::empty(2, LevelBounds::sized(4000.0, 4000.0));
        add_cloud_layer(&mut level, 2400.0, 1.0, 120, &mut rng);

        assert_eq!(level.clouds_back.len(), 20);
        assert_eq!(level.clouds_front.len(), 20);
        for cloud in level.clouds_back.iter().chain(&level.clouds_front) {
            assert!((2300.0..2500.0).contains(&cloud.position.y));
            assert!((-1000.0..4000.0).contains(&cloud.position.x));
            assert!((20.0..=90.0).contains(&cloud.radius));
        }
        assert!(level.clouds_back.iter().all(|cloud| cloud.opacity == 0.95));
        assert!(level.clouds_front.iter().all(|cloud| cloud.opacity == 0.7));
    }

    #[test]
    fn houses_stand_on_the_level_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut level = Level::empty(1, LevelBounds::sized(2000.0, 1500.0));
        add_house_layer(&mut level, false, &mut rng);

        assert_eq!(level.decorations.len(), 200);
        for decoration in &level.decorations {
            let Decoration::House(house) = decoration else {
                panic!("unexpected decoration {decoration:?}");
            };
            assert!((house.bottom() - 1500.0).abs() < 1e-3);
            assert!(house.height >= 50.0 && house.height <= 150.0);
        }
    }

    #[test]
    fn roof_spans_the_level() {
        let mut level = Level::empty(2, LevelBounds::sized(4000.0, 4000.0));
        add_roof(&mut level);
        assert_eq!(
            level.decorations,
            vec![Decoration::Roof(Rect::new(0.0, 3970.0, 4000.0, 30.0))]
        );
    }
}
