use ecocity_snake_core::constants::{GRID_SIZE, TICK_INTERVAL_MS};
use ecocity_snake_core::rng::ScriptedRng;
use ecocity_snake_core::scheduler::{Clock, VirtualClock};
use ecocity_snake_core::{
    build_display_leaderboard, Direction, GameOverCause, GridPosition, LeaderboardEntry,
    SessionController, SessionStatus, StepEvent,
};

// Cell 0 is (0,0): every placement lands in the top-left corner, away from
// the row the actor travels along.
fn corner_rng() -> ScriptedRng {
    ScriptedRng::new(vec![0])
}

#[test]
fn head_advances_one_cell_per_tick() {
    let mut clock = VirtualClock::new(0);
    let mut session = SessionController::new(corner_rng());
    session.start(clock.now_ms());

    clock.advance(TICK_INTERVAL_MS);
    let reports = session.advance_to(clock.now_ms());

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].event, StepEvent::Moved);
    assert_eq!(session.state().actor.head(), GridPosition::new(11, 10));
    assert_eq!(session.state().actor.len(), 1);
}

#[test]
fn running_off_the_right_edge_ends_the_run() {
    let mut clock = VirtualClock::new(0);
    let mut session = SessionController::new(corner_rng());
    session.start(clock.now_ms());

    // (10,10) -> (19,10) takes nine ticks.
    for _ in 0..9 {
        clock.advance(TICK_INTERVAL_MS);
        let reports = session.advance_to(clock.now_ms());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].event, StepEvent::Moved);
    }
    assert_eq!(session.state().actor.head(), GridPosition::new(GRID_SIZE - 1, 10));

    clock.advance(TICK_INTERVAL_MS);
    let reports = session.advance_to(clock.now_ms());
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].event, StepEvent::CollidedWall);
    let (cause, result) = reports[0].game_over.expect("terminal");
    assert_eq!(cause, GameOverCause::Wall);
    assert_eq!(result.finished_at_ms, clock.now_ms());
    assert_eq!(session.status(), SessionStatus::GameOver);
    assert!(!session.timer().is_active());

    let frozen = session.state().clone();
    clock.advance(TICK_INTERVAL_MS * 20);
    assert!(session.advance_to(clock.now_ms()).is_empty());
    assert!(session.tick(clock.now_ms()).is_none());
    assert_eq!(session.state(), &frozen);
}

#[test]
fn reset_after_game_over_starts_a_clean_run() {
    let mut clock = VirtualClock::new(0);
    let mut session = SessionController::new(corner_rng());
    session.start(0);
    session.request_direction(Direction::Up);
    clock.advance(TICK_INTERVAL_MS * 30);
    let _ = session.advance_to(clock.now_ms());
    assert_eq!(session.status(), SessionStatus::GameOver);

    session.reset(clock.now_ms());
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.score(), 0);
    assert_eq!(session.state().actor.head(), GridPosition::new(10, 10));
    assert_eq!(session.state().direction, Direction::Right);
}

#[test]
fn live_rows_override_seed_rows() {
    let seed = vec![LeaderboardEntry {
        id: "s1".to_string(),
        name: "Seed".to_string(),
        photo_url: None,
        highest_score: 200,
    }];
    let live = vec![LeaderboardEntry {
        id: "s1".to_string(),
        name: "Live".to_string(),
        photo_url: None,
        highest_score: 50,
    }];

    let board = build_display_leaderboard(&live, &seed);
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].highest_score, 50);
    assert_eq!(board[0].name, "Live");
}
