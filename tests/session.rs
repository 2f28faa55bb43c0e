use rand::rngs::StdRng;
use rand::SeedableRng;

use color_snake::game::{GameSession, SessionConfig};
use color_snake::playfield::Playfield;
use color_snake::snake::Heading;
use color_snake::surface::{Action, NoopSurface};

fn config(two_player: bool, wall_teleport: bool) -> SessionConfig {
    SessionConfig {
        two_player,
        speed: 2,
        initial_length: 8,
        food_abundance: 2,
        wall_teleport,
        highscore: 0,
    }
}

fn field() -> Playfield {
    Playfield::new(2000.0, 2000.0)
}

#[test]
fn pellets_score_and_fill_before_growing() {
    let mut surface = NoopSurface;
    let mut cfg = config(false, true);
    cfg.food_abundance = 0;
    let mut session =
        GameSession::with_rng(cfg, field(), &mut surface, StdRng::seed_from_u64(11));
    session.snakes_mut()[0].uncolor_segments();

    for eaten in 1..=3u32 {
        let head = session.snakes()[0].head_pos();
        session.spawn_food(Some((head.0 + 45.0, head.1)), Some((255, 87, 51)));
        session.tick().unwrap();
        assert_eq!(session.snakes()[0].score(), eaten);
    }

    // Still filling in blank segments, so the chain has not grown.
    assert_eq!(session.snakes()[0].len(), 8);
    assert_eq!(session.outcome().highscore, 3);
}

#[test]
fn wall_breach_teleports_to_opposite_edge() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, true), field(), &mut surface, StdRng::seed_from_u64(2));
    session.snakes_mut()[0].move_segment(0, (2005.0, 40.0));

    session.tick().unwrap();

    let snake = &session.snakes()[0];
    assert_eq!(snake.head_pos(), (-2000.0, 40.0));
    assert_eq!(snake.len(), 8);
    assert_eq!(snake.score(), 0);
}

#[test]
fn wall_breach_without_teleport_is_catastrophic() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, false), field(), &mut surface, StdRng::seed_from_u64(3));
    session.snakes_mut()[0].set_score(Some(9));
    session.snakes_mut()[0].move_segment(0, (2005.0, 40.0));

    session.tick().unwrap();

    let snake = &session.snakes()[0];
    assert_eq!(snake.len(), 4);
    assert_eq!(snake.score(), 2);
    assert!(snake.segments().iter().all(|seg| seg.color.is_none()));
    // The four dispersed colored segments each left a pellet behind.
    assert_eq!(session.food().active_count(), 4);
}

#[test]
fn self_collision_repairs_from_the_crash_point() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, true), field(), &mut surface, StdRng::seed_from_u64(8));

    // Steer a tight loop; on the fourth step the head lands back on the cell
    // it started from, which is now body segment 4.
    session.tick().unwrap();
    session.apply_action(Action::Turn(0, Heading::Up)).unwrap();
    session.tick().unwrap();
    session.apply_action(Action::Turn(0, Heading::Left)).unwrap();
    session.tick().unwrap();
    session.apply_action(Action::Turn(0, Heading::Down)).unwrap();
    session.tick().unwrap();

    let snake = &session.snakes()[0];
    assert_eq!(snake.last_collision_index(), 4);
    assert_eq!(snake.len(), 4);
    assert_eq!(snake.score(), 4);
    assert!(snake.segments().iter().all(|seg| seg.color.is_none()));
    assert_eq!(session.food().active_count(), 4);
}

#[test]
fn simultaneous_contact_victimizes_player_two() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(true, true), field(), &mut surface, StdRng::seed_from_u64(4));
    // Park player two's head right next to player one's body row.
    session.snakes_mut()[1].move_segment(0, (10.0, 40.0));

    session.tick().unwrap();

    assert_eq!(session.snakes()[0].len(), 8);
    assert_eq!(session.snakes()[1].len(), 4);
    assert_eq!(session.snakes()[1].score(), 0);
}

#[test]
fn session_start_seeds_one_pellet_per_colored_segment() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, true), field(), &mut surface, StdRng::seed_from_u64(5));

    session.seed_food().unwrap();

    assert_eq!(session.food().active_count(), 8);
    let snake = &session.snakes()[0];
    assert_eq!(snake.len(), 8);
    assert!(snake.segments().iter().all(|seg| seg.color.is_none()));
    assert!(snake.segments().iter().all(|seg| seg.visible));

    // Retracted home after the seeding animation.
    let (hx, hy) = snake.head_pos();
    assert!(hx.abs() < 1e-3);
    assert!((hy - 40.0).abs() < 1e-3);
}

#[test]
fn pause_toggles_and_blocks_turns() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, true), field(), &mut surface, StdRng::seed_from_u64(6));
    session.tick().unwrap(); // first move unlocks input

    session.apply_action(Action::TogglePause).unwrap();
    assert!(!session.is_active());
    session.apply_action(Action::Turn(0, Heading::Up)).unwrap();
    assert_eq!(session.snakes()[0].heading(), Heading::Right);

    session.apply_action(Action::TogglePause).unwrap();
    assert!(session.is_active());
    session.apply_action(Action::Turn(0, Heading::Up)).unwrap();
    assert_eq!(session.snakes()[0].heading(), Heading::Up);
}

#[test]
fn speed_clamps_between_one_and_four() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, true), field(), &mut surface, StdRng::seed_from_u64(7));

    for _ in 0..6 {
        session.apply_action(Action::SpeedUp).unwrap();
    }
    assert_eq!(session.config().speed, 4);

    for _ in 0..9 {
        session.apply_action(Action::SpeedDown).unwrap();
    }
    assert_eq!(session.config().speed, 1);
}

#[test]
fn active_food_converges_to_abundance() {
    let mut surface = NoopSurface;
    let mut session =
        GameSession::with_rng(config(false, true), field(), &mut surface, StdRng::seed_from_u64(9));

    let head = session.snakes()[0].head_pos();
    session.spawn_food(Some((head.0 + 45.0, head.1)), Some((1, 1, 1)));
    session.spawn_food(Some((500.0, 500.0)), None);
    session.spawn_food(Some((-500.0, 500.0)), None);

    session.tick().unwrap();

    assert_eq!(session.snakes()[0].score(), 1);
    assert_eq!(session.food().active_count(), 2);
}
