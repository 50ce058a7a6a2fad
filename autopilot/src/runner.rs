use crate::bots::{bot_ids, create_bot, AutopilotBot};
use anyhow::{anyhow, Result};
use ecocity_snake_core::scheduler::{Clock, SystemClock, VirtualClock};
use ecocity_snake_core::{
    GameOverCause, RunResult, SeededRng, SessionController, SessionStatus, StepEvent,
};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub seed: u32,
    pub max_ticks: u64,
    pub tick_count: u64,
    pub final_score: u32,
    pub final_length: usize,
    pub consumed: u32,
    pub turns: u32,
    pub game_over: bool,
    pub cause: Option<GameOverCause>,
    pub run_result: Option<RunResult>,
}

/// Per-tick progress handed to an observer during paced runs.
#[derive(Clone, Copy, Debug)]
pub struct TickProgress {
    pub tick: u64,
    pub score: u32,
    pub length: usize,
    pub event: StepEvent,
}

fn resolve_bot(bot_id: &str) -> Result<Box<dyn AutopilotBot>> {
    create_bot(bot_id).ok_or_else(|| {
        anyhow!(
            "unknown bot '{bot_id}'. available: {}",
            bot_ids().join(", ")
        )
    })
}

/// Headless run on a virtual clock. Deterministic for a given bot and seed.
pub fn run_bot(bot_id: &str, seed: u32, max_ticks: u64) -> Result<RunMetrics> {
    let mut clock = VirtualClock::new(0);
    let jump_to_next_tick = |session: &SessionController<SeededRng>| {
        let due = session.timer().next_due_ms()?;
        clock.advance(due.saturating_sub(clock.now_ms()));
        Some(clock.now_ms())
    };
    drive(bot_id, seed, max_ticks, jump_to_next_tick, |_| {})
}

/// Wall-clock run paced by the session's own tick period. Each wait ends at
/// the tick's due time, so exactly one tick runs per wait.
pub fn run_bot_realtime<F>(
    bot_id: &str,
    seed: u32,
    max_ticks: u64,
    on_tick: F,
) -> Result<RunMetrics>
where
    F: FnMut(&TickProgress),
{
    let clock = SystemClock::new();
    let sleep_until_due = |session: &SessionController<SeededRng>| {
        let due = session.timer().next_due_ms()?;
        let now = clock.now_ms();
        if due > now {
            thread::sleep(Duration::from_millis(due - now));
        }
        Some(due)
    };
    drive(bot_id, seed, max_ticks, sleep_until_due, on_tick)
}

fn drive<W, F>(
    bot_id: &str,
    seed: u32,
    max_ticks: u64,
    mut wait_for_tick: W,
    mut on_tick: F,
) -> Result<RunMetrics>
where
    W: FnMut(&SessionController<SeededRng>) -> Option<u64>,
    F: FnMut(&TickProgress),
{
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be >= 1"));
    }
    let mut bot = resolve_bot(bot_id)?;
    bot.reset(seed);

    let mut session = SessionController::new(SeededRng::new(seed));
    session.start(0);

    let mut metrics = RunMetrics {
        bot_id: bot.id().to_string(),
        seed,
        max_ticks,
        tick_count: 0,
        final_score: 0,
        final_length: session.state().actor.len(),
        consumed: 0,
        turns: 0,
        game_over: false,
        cause: None,
        run_result: None,
    };

    while session.status() == SessionStatus::Running && session.ticks() < max_ticks {
        if let Some(direction) = bot.next_direction(session.state()) {
            if direction != session.state().direction && session.request_direction(direction) {
                metrics.turns += 1;
            }
        }

        let Some(now_ms) = wait_for_tick(&session) else {
            break;
        };
        for report in session.advance_to(now_ms) {
            if report.event == StepEvent::Consumed {
                metrics.consumed += 1;
            }
            on_tick(&TickProgress {
                tick: report.tick,
                score: report.score,
                length: session.state().actor.len(),
                event: report.event,
            });
            if let Some((cause, run)) = report.game_over {
                metrics.game_over = true;
                metrics.cause = Some(cause);
                metrics.run_result = Some(run);
            }
        }
    }

    session.teardown();
    metrics.tick_count = session.ticks();
    metrics.final_score = session.score();
    metrics.final_length = session.state().actor.len();
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_bot_hits_the_wall() {
        let metrics = run_bot("straight", 7, 1_000).unwrap();
        assert!(metrics.game_over);
        assert_eq!(metrics.cause, Some(GameOverCause::Wall));
        // Start column 10 on a 20-wide board: nine safe moves, the tenth crashes.
        assert_eq!(metrics.tick_count, 10);
        assert_eq!(metrics.turns, 0);
        assert_eq!(
            metrics.run_result.map(|r| r.score),
            Some(metrics.final_score)
        );
    }

    #[test]
    fn headless_runs_are_deterministic() {
        let a = run_bot("greedy", 0xBEEF, 400).unwrap();
        let b = run_bot("greedy", 0xBEEF, 400).unwrap();
        assert_eq!(a.tick_count, b.tick_count);
        assert_eq!(a.final_score, b.final_score);
        assert_eq!(a.turns, b.turns);
    }

    #[test]
    fn tick_cap_stops_without_game_over() {
        let metrics = run_bot("flood", 3, 5).unwrap();
        assert_eq!(metrics.tick_count, 5);
        assert!(!metrics.game_over);
        assert!(metrics.run_result.is_none());
    }

    #[test]
    fn realtime_run_is_paced_by_the_tick_period() {
        let started = std::time::Instant::now();
        let mut seen = Vec::new();
        let metrics =
            run_bot_realtime("straight", 7, 2, |progress| seen.push(progress.tick)).unwrap();

        assert_eq!(metrics.tick_count, 2);
        assert!(!metrics.game_over);
        assert_eq!(seen, vec![1, 2]);
        // Two ticks at 150 ms each cannot fire sooner than 300 ms after start.
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn unknown_bot_and_zero_cap_are_errors() {
        assert!(run_bot("nope", 1, 10).is_err());
        assert!(run_bot("greedy", 1, 0).is_err());
    }
}
