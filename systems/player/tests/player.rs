use std::time::Duration;

use troposphere_core::{
    Command, ControlInput, Ladder, LevelBounds, MovementKeys, Platform, Player, PlayerState, Point,
    Rect, Tuning,
};
use troposphere_system_player::{Config, PlayerPhysics, StepOutcome, Surroundings};

const BOUNDS: LevelBounds = LevelBounds::sized(2000.0, 1500.0);

fn physics() -> PlayerPhysics {
    PlayerPhysics::new(Config::from_tuning(&Tuning::default()))
}

fn player_at(x: f32, y: f32) -> Player {
    Player::new(Point::new(x, y), &Tuning::default())
}

fn step(
    physics: &PlayerPhysics,
    player: &mut Player,
    input: ControlInput,
    platforms: &[Platform],
    ladders: &[Ladder],
    now: Duration,
) -> (StepOutcome, Vec<Command>) {
    let surroundings = Surroundings {
        platforms,
        ladders,
        bounds: BOUNDS,
    };
    let mut commands = Vec::new();
    let outcome = physics.step(player, &input, &surroundings, now, &mut commands);
    (outcome, commands)
}

fn keys(movement: MovementKeys) -> ControlInput {
    ControlInput {
        movement,
        ..ControlInput::IDLE
    }
}

#[test]
fn resting_on_a_platform_is_stable() {
    let physics = physics();
    let platforms = [Platform::solid(Rect::new(0.0, 1000.0, 800.0, 20.0))];
    let mut player = player_at(100.0, 915.0);

    for tick in 0..10 {
        let (outcome, commands) = step(
            &physics,
            &mut player,
            ControlInput::IDLE,
            &platforms,
            &[],
            Duration::from_millis(tick * 16),
        );
        assert_eq!(outcome, StepOutcome::Continued);
        assert!(commands.is_empty());
        assert_eq!(player.body.origin(), Point::new(100.0, 915.0));
        assert_eq!(player.state, PlayerState::OnPlatform);
    }
}

#[test]
fn resting_on_the_level_floor_is_stable() {
    let physics = physics();
    let mut player = player_at(100.0, 1410.0);

    let _ = step(
        &physics,
        &mut player,
        ControlInput::IDLE,
        &[],
        &[],
        Duration::ZERO,
    );

    assert_eq!(player.body.y, 1410.0);
    assert_eq!(player.state, PlayerState::OnPlatform);
}

#[test]
fn deadly_fall_swaps_dimensions_exactly_once() {
    let physics = physics();
    let mut player = player_at(100.0, 200.0);
    player.state = PlayerState::Falling;
    player.y_vel = 41.0;

    let _ = step(&physics, &mut player, ControlInput::IDLE, &[], &[], Duration::ZERO);
    assert!(player.falling_to_ground);
    assert_eq!((player.body.width, player.body.height), (90.0, 30.0));

    let _ = step(
        &physics,
        &mut player,
        ControlInput::IDLE,
        &[],
        &[],
        Duration::from_millis(16),
    );
    assert!(player.falling_to_ground);
    assert_eq!((player.body.width, player.body.height), (90.0, 30.0));
}

#[test]
fn deadly_fall_ignores_controls() {
    let physics = physics();
    let mut player = player_at(100.0, 200.0);
    player.state = PlayerState::Falling;
    player.y_vel = 45.0;

    let input = keys(MovementKeys {
        right: true,
        ..MovementKeys::default()
    });
    let _ = step(&physics, &mut player, input, &[], &[], Duration::ZERO);

    assert_eq!(player.body.x, 100.0);
}

#[test]
fn landing_after_deadly_fall_kills_and_shakes_camera() {
    let physics = physics();
    let mut player = player_at(100.0, 1460.0);
    player.body = Rect::new(100.0, 1460.0, 90.0, 30.0);
    player.state = PlayerState::Falling;
    player.falling_to_ground = true;
    player.y_vel = 60.0;

    let (outcome, commands) =
        step(&physics, &mut player, ControlInput::IDLE, &[], &[], Duration::ZERO);

    assert_eq!(
        outcome,
        StepOutcome::Died {
            impact_velocity: 61.0
        }
    );
    assert_eq!(player.state, PlayerState::Dead);
    assert_eq!(player.body.y, 1470.0);
    match commands.as_slice() {
        [Command::ShakeCamera { power, length }] => {
            assert!((power - 10.25).abs() < 1e-4, "unexpected power {power}");
            assert_eq!(*length, 0.5);
        }
        other => panic!("expected a single shake, got {other:?}"),
    }
}

#[test]
fn dead_player_never_moves_again() {
    let physics = physics();
    let mut player = player_at(100.0, 1410.0);
    player.state = PlayerState::Dead;
    player.x_vel = 30.0;
    player.y_vel = 5.0;

    let input = ControlInput {
        movement: MovementKeys {
            left: true,
            up: true,
            ..MovementKeys::default()
        },
        anti_gravity: true,
        rewind: false,
    };
    for tick in 0..30 {
        let _ = step(
            &physics,
            &mut player,
            input,
            &[],
            &[],
            Duration::from_millis(tick * 16),
        );
    }

    assert_eq!(player.body.origin(), Point::new(100.0, 1410.0));
    assert_eq!(player.state, PlayerState::Dead);
}

#[test]
fn horizontal_position_is_clamped_to_level() {
    let physics = physics();
    let right = keys(MovementKeys {
        right: true,
        ..MovementKeys::default()
    });
    let left = keys(MovementKeys {
        left: true,
        ..MovementKeys::default()
    });

    let mut player = player_at(1968.0, 1410.0);
    for _ in 0..3 {
        let _ = step(&physics, &mut player, right, &[], &[], Duration::ZERO);
        assert!(player.body.x <= BOUNDS.width - player.body.width);
    }
    assert_eq!(player.body.x, 1970.0);

    let mut player = player_at(3.0, 1410.0);
    for _ in 0..3 {
        let _ = step(&physics, &mut player, left, &[], &[], Duration::ZERO);
        assert!(player.body.x >= BOUNDS.left);
    }
    assert_eq!(player.body.x, 0.0);
    assert!(player.facing_left);
}

#[test]
fn knock_back_is_clamped_at_the_level_edge() {
    let physics = physics();
    let mut player = player_at(10.0, 1410.0);
    physics.knock_back(&mut player, -1.0);
    assert_eq!(player.x_vel, -20.0);

    let _ = step(&physics, &mut player, ControlInput::IDLE, &[], &[], Duration::ZERO);

    assert_eq!(player.body.x, 0.0);
    assert_eq!(player.x_vel, 0.0);
}

#[test]
fn knock_back_is_ignored_above_cap() {
    let physics = physics();
    let mut player = player_at(500.0, 1410.0);
    player.x_vel = 100.0;
    physics.knock_back(&mut player, 1.0);
    assert_eq!(player.x_vel, 100.0);
}

#[test]
fn jump_from_the_floor() {
    let physics = physics();
    let mut player = player_at(100.0, 1410.0);
    let input = keys(MovementKeys {
        up: true,
        ..MovementKeys::default()
    });

    let _ = step(&physics, &mut player, input, &[], &[], Duration::ZERO);

    assert_eq!(player.state, PlayerState::Falling);
    assert_eq!(player.y_vel, -14.0);
    assert_eq!(player.body.y, 1396.0);
}

#[test]
fn anti_gravity_key_also_jumps() {
    let physics = physics();
    let platforms = [Platform::solid(Rect::new(0.0, 1000.0, 800.0, 20.0))];
    let mut player = player_at(100.0, 915.0);
    player.anti_gravity = true;
    let input = ControlInput {
        anti_gravity: true,
        ..ControlInput::IDLE
    };

    let _ = step(&physics, &mut player, input, &platforms, &[], Duration::ZERO);

    assert_eq!(player.state, PlayerState::Falling);
    assert_eq!(player.y_vel, -14.5);
}

#[test]
fn ledge_grace_allows_a_late_jump() {
    let physics = physics();
    let up = keys(MovementKeys {
        up: true,
        ..MovementKeys::default()
    });

    let mut player = player_at(900.0, 500.0);
    player.state = PlayerState::Falling;
    player.y_vel = 3.0;
    player.latest_on_platform = Some(Duration::from_millis(1_000));
    let _ = step(&physics, &mut player, up, &[], &[], Duration::from_millis(1_150));
    assert_eq!(player.y_vel, -14.0);

    let mut player = player_at(900.0, 500.0);
    player.state = PlayerState::Falling;
    player.y_vel = 3.0;
    player.latest_on_platform = Some(Duration::from_millis(1_000));
    let _ = step(&physics, &mut player, up, &[], &[], Duration::from_millis(1_250));
    assert_eq!(player.y_vel, 4.0);
}

#[test]
fn up_at_ladder_bottom_climbs_instead_of_jumping() {
    let physics = physics();
    let ladders = [Ladder {
        bounds: Rect::new(100.0, 1200.0, 30.0, 300.0),
    }];
    let mut player = player_at(100.0, 1410.0);
    let up = keys(MovementKeys {
        up: true,
        ..MovementKeys::default()
    });

    let _ = step(&physics, &mut player, up, &[], &ladders, Duration::ZERO);

    assert_eq!(player.state, PlayerState::Climbing);
    assert_eq!(player.y_vel, 0.0);
    assert_eq!(player.body.y, 1408.0);
}

#[test]
fn leaving_the_ladder_sideways_starts_a_fall() {
    let physics = physics();
    let mut player = player_at(500.0, 800.0);
    player.state = PlayerState::Climbing;

    let _ = step(&physics, &mut player, ControlInput::IDLE, &[], &[], Duration::ZERO);

    assert_eq!(player.state, PlayerState::Falling);
    assert_eq!(player.y_vel, 1.0);
}

#[test]
fn reaching_the_ladder_top_steps_onto_the_platform() {
    let physics = physics();
    let platforms = [Platform::solid(Rect::new(0.0, 1200.0, 800.0, 20.0))];
    let ladders = [Ladder {
        bounds: Rect::new(100.0, 1200.0, 30.0, 300.0),
    }];
    let mut player = player_at(100.0, 1115.0);
    player.state = PlayerState::Climbing;
    let up = keys(MovementKeys {
        up: true,
        ..MovementKeys::default()
    });

    let _ = step(&physics, &mut player, up, &platforms, &ladders, Duration::ZERO);
    assert_eq!(player.state, PlayerState::OnPlatform);
    assert!(player.stop_climbing);

    // Holding up keeps the latch set, so no jump follows.
    let _ = step(
        &physics,
        &mut player,
        up,
        &platforms,
        &ladders,
        Duration::from_millis(16),
    );
    assert_eq!(player.state, PlayerState::OnPlatform);
    assert_eq!(player.body.y, 1115.0);
}

#[test]
fn swirl_hides_player_after_delay() {
    let physics = physics();
    let mut player = player_at(300.0, 600.0);
    physics.begin_swirl(&mut player, Duration::from_secs(10));
    assert_eq!(player.state, PlayerState::Swirling);

    let _ = step(
        &physics,
        &mut player,
        ControlInput::IDLE,
        &[],
        &[],
        Duration::from_millis(10_400),
    );
    assert!(!player.hidden);
    assert_eq!(player.body.y, 600.0);
    assert!(player.swirl_angle > 0.0);

    let _ = step(
        &physics,
        &mut player,
        ControlInput::IDLE,
        &[],
        &[],
        Duration::from_millis(10_600),
    );
    assert!(player.hidden);
    assert_eq!(player.body.y, -200.0);
    assert_eq!(player.state, PlayerState::Swirling);
}

#[test]
fn dead_player_cannot_swirl() {
    let physics = physics();
    let mut player = player_at(300.0, 1410.0);
    player.state = PlayerState::Dead;
    physics.begin_swirl(&mut player, Duration::ZERO);
    assert_eq!(player.state, PlayerState::Dead);
}
