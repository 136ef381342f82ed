use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use troposphere_core::{Hostile, Level, LevelBounds, PlayerState, MAX_LEVEL};
use troposphere_system_level_generation::{
    generate_tower, Config, LevelGenerator, LevelSelection, TowerLayout,
};

fn single_tower(seed: u64, floor_count: u32) -> Level {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut level = Level::empty(1, LevelBounds::sized(2000.0, 6000.0));
    let _ = generate_tower(
        &TowerLayout::default(),
        &mut level,
        1000.0,
        floor_count,
        120,
        &mut rng,
    );
    level
}

fn platforms_per_floor(level: &Level) -> BTreeMap<i64, usize> {
    let mut floors = BTreeMap::new();
    for platform in &level.platforms {
        *floors.entry(platform.bounds.y as i64).or_insert(0) += 1;
    }
    floors
}

fn ready(selection: LevelSelection) -> Level {
    match selection {
        LevelSelection::Ready(level) => level,
        LevelSelection::GameFinished => panic!("expected a playable level"),
    }
}

#[test]
fn never_generates_two_split_floors_in_a_row() {
    for seed in 0..300 {
        let level = single_tower(seed, 15);
        let floors = platforms_per_floor(&level);
        assert_eq!(floors.len(), 15);

        let split: Vec<bool> = floors.values().map(|count| *count == 2).collect();
        for pair in split.windows(2) {
            assert!(
                !(pair[0] && pair[1]),
                "seed {seed} produced adjacent split floors"
            );
        }
    }
}

#[test]
fn some_floors_are_split() {
    let split_floors: usize = (0..50)
        .map(|seed| {
            platforms_per_floor(&single_tower(seed, 10))
                .values()
                .filter(|count| **count == 2)
                .count()
        })
        .sum();
    assert!(split_floors > 0);
}

#[test]
fn three_floor_tower_has_three_backdrops_and_enough_ladders() {
    for seed in 0..100 {
        let level = single_tower(seed, 3);
        assert_eq!(level.platform_backgrounds.len(), 3);
        assert!(level.platform_backgrounds.iter().all(|bg| bg.is_background));
        assert!(
            level.ladders.len() >= 3,
            "seed {seed} produced {} ladders",
            level.ladders.len()
        );
    }
}

#[test]
fn every_ladder_is_inside_a_platform_span() {
    for seed in 0..100 {
        let level = single_tower(seed, 12);
        for ladder in &level.ladders {
            let owner = level.platforms.iter().find(|platform| {
                platform.bounds.y == ladder.bounds.y
                    && platform.bounds.x <= ladder.bounds.x
                    && ladder.bounds.right() <= platform.bounds.right()
            });
            assert!(owner.is_some(), "seed {seed}: ladder {ladder:?} overhangs");
        }
    }
}

#[test]
fn ladders_on_one_platform_never_overlap() {
    for seed in 0..100 {
        let level = single_tower(seed, 12);
        for (index, ladder) in level.ladders.iter().enumerate() {
            for other in &level.ladders[index + 1..] {
                assert!(
                    !ladder.bounds.overlaps(&other.bounds),
                    "seed {seed}: overlapping ladders"
                );
            }
        }
    }
}

#[test]
fn enemies_only_patrol_solid_floors() {
    for seed in 0..100 {
        let level = single_tower(seed, 10);
        for hostile in &level.hostiles {
            let Hostile::Patroller(enemy) = hostile else {
                panic!("towers only spawn ground enemies");
            };
            let platform = level
                .platform(enemy.platform)
                .expect("enemy bound to a platform");
            assert_eq!(platform.bounds.width, 800.0);
            assert_eq!(enemy.bounds.bottom(), platform.bounds.y);
            assert!(enemy.bounds.x >= platform.bounds.x);
            assert!(enemy.bounds.right() <= platform.bounds.right());
            assert!((1.0..7.0).contains(&enemy.dx));
        }
    }
}

#[test]
fn generation_is_deterministic_per_seed() {
    let generator = LevelGenerator::default();
    for number in 0..=MAX_LEVEL {
        let first = generator.create_level(number, &mut ChaCha8Rng::seed_from_u64(99));
        let second = generator.create_level(number, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(first, second, "level {number} diverged");
    }
}

#[test]
fn beyond_the_last_level_the_game_is_finished() {
    let generator = LevelGenerator::new(Config::default());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        generator.create_level(MAX_LEVEL + 1, &mut rng),
        LevelSelection::GameFinished
    );
    assert_eq!(
        generator.create_level(u32::MAX, &mut rng),
        LevelSelection::GameFinished
    );
}

#[test]
fn idle_level_has_no_player() {
    let generator = LevelGenerator::default();
    let level = ready(generator.create_level(0, &mut ChaCha8Rng::seed_from_u64(1)));
    assert_eq!(level.number, 0);
    assert!(level.player.is_none());
    assert!(level.platforms.is_empty());
}

#[test]
fn simple_level_matches_its_recipe() {
    let generator = LevelGenerator::default();
    let level = ready(generator.create_level(1, &mut ChaCha8Rng::seed_from_u64(5)));

    assert_eq!(level.bounds, LevelBounds::sized(2000.0, 1500.0));
    assert_eq!(level.platform_backgrounds.len(), 3);
    assert_eq!(level.decorations.len(), 400);
    assert_eq!(level.portals.len(), 1);
    assert_eq!(level.portals[0].bounds.x, 900.0);
    assert_eq!(level.portals[0].bounds.y, 400.0);
    assert!(level.waypoints.is_empty());

    let player = level.player.as_ref().expect("player placed");
    assert_eq!(player.body.origin().x, 100.0);
    assert_eq!(player.body.bottom(), 1500.0);
    assert_eq!(player.state, PlayerState::OnPlatform);
}

#[test]
fn two_tower_level_has_drones_and_waypoints() {
    let generator = LevelGenerator::default();
    let level = ready(generator.create_level(2, &mut ChaCha8Rng::seed_from_u64(5)));

    assert_eq!(level.bounds, LevelBounds::sized(4000.0, 4000.0));
    assert_eq!(level.platform_backgrounds.len(), 17);
    assert_eq!(level.waypoints.len(), 7);
    assert_eq!(level.clouds_back.len(), 40);
    assert_eq!(level.clouds_front.len(), 40);

    let drones: Vec<_> = level
        .hostiles
        .iter()
        .filter_map(|hostile| match hostile {
            Hostile::Drone(drone) => Some(drone),
            Hostile::Patroller(_) => None,
        })
        .collect();
    assert_eq!(drones.len(), 8);
    for drone in drones {
        assert!((1.0..1.5).contains(&drone.speed));
        assert!((100.0..700.0).contains(&drone.follow_distance));
        assert!(drone.bounds.y < 3500.0);
    }

    // Portal sits on top of the taller tower, a third in from its right edge.
    let portal = &level.portals[0];
    assert!((portal.bounds.x - (2900.0 - 800.0 / 3.0)).abs() < 1e-3);
    assert_eq!(portal.bounds.y, 4000.0 - 3000.0 - 200.0);
}

#[test]
fn high_tower_level_has_twelve_drones() {
    let generator = LevelGenerator::default();
    let level = ready(generator.create_level(3, &mut ChaCha8Rng::seed_from_u64(5)));

    assert_eq!(level.bounds, LevelBounds::sized(5000.0, 6000.0));
    assert_eq!(level.platform_backgrounds.len(), 35);
    assert_eq!(level.waypoints.len(), 6);
    let drones = level
        .hostiles
        .iter()
        .filter(|hostile| matches!(hostile, Hostile::Drone(_)))
        .count();
    assert_eq!(drones, 12);
    assert_eq!(level.portals[0].bounds.x, 2500.0);
    assert_eq!(level.portals[0].bounds.y, 6000.0 - 4500.0 - 200.0);
}
