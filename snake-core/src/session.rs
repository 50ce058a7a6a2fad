//! Session lifecycle: owns the board state and the tick timer, and turns
//! grid events into `not_started -> running -> game_over` transitions.

use serde::{Deserialize, Serialize};

use crate::constants::TICK_INTERVAL_MS;
use crate::grid::{self, Actor, Collectible, Direction, GridPosition, StepEvent};
use crate::input::accept_direction;
use crate::rng::RandomSource;
use crate::scheduler::TickTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    Wall,
    SelfCollision,
    /// The actor filled every cell, leaving nowhere to place a collectible.
    BoardCleared,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub score: u32,
    pub direction: Direction,
    pub pending_direction: Direction,
    pub actor: Actor,
    pub collectible: Option<Collectible>,
}

impl SessionState {
    fn fresh(status: SessionStatus, rng: &mut impl RandomSource) -> Self {
        let actor = Actor::new(GridPosition::start());
        let collectible = grid::place_collectible(&actor, rng);
        Self {
            status,
            score: 0,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            actor,
            collectible,
        }
    }
}

/// Outcome of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u32,
    pub finished_at_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub event: StepEvent,
    pub points: u32,
    pub score: u32,
    /// Set only on the tick that ends the session.
    pub game_over: Option<(GameOverCause, RunResult)>,
}

pub struct SessionController<R: RandomSource> {
    state: SessionState,
    timer: TickTimer,
    rng: R,
    ticks: u64,
    terminated: bool,
}

impl<R: RandomSource> SessionController<R> {
    pub fn new(rng: R) -> Self {
        Self::with_period(rng, TICK_INTERVAL_MS)
    }

    pub fn with_period(mut rng: R, period_ms: u64) -> Self {
        let state = SessionState::fresh(SessionStatus::NotStarted, &mut rng);
        Self {
            state,
            timer: TickTimer::new(period_ms),
            rng,
            ticks: 0,
            terminated: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Begin a session. From any state this fully reinitializes the board and
    /// re-arms the timer; it is the same transition as [`Self::reset`].
    pub fn start(&mut self, now_ms: u64) {
        if self.terminated {
            return;
        }
        self.timer.stop();
        self.state = SessionState::fresh(SessionStatus::Running, &mut self.rng);
        self.ticks = 0;
        self.timer.start(now_ms);
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.start(now_ms);
    }

    /// Buffer a heading for the next tick. Returns whether it was accepted.
    pub fn request_direction(&mut self, requested: Direction) -> bool {
        if self.terminated {
            return false;
        }
        match accept_direction(self.state.status, self.state.direction, requested) {
            Some(direction) => {
                self.state.pending_direction = direction;
                true
            }
            None => false,
        }
    }

    /// Run one simulation step. A no-op unless the session is running with an
    /// armed timer.
    pub fn tick(&mut self, now_ms: u64) -> Option<TickReport> {
        if self.terminated || self.state.status != SessionStatus::Running || !self.timer.is_active()
        {
            return None;
        }
        let collectible = self.state.collectible?;

        self.state.direction = self.state.pending_direction;
        let outcome = grid::step(
            &self.state.actor,
            &collectible,
            self.state.direction,
            &mut self.rng,
        );
        self.ticks += 1;

        let cause = match outcome.event {
            StepEvent::CollidedWall => Some(GameOverCause::Wall),
            StepEvent::CollidedSelf => Some(GameOverCause::SelfCollision),
            StepEvent::Moved | StepEvent::Consumed => {
                self.state.score = self.state.score.saturating_add(outcome.points);
                self.state.actor = outcome.actor;
                self.state.collectible = outcome.collectible;
                self.state
                    .collectible
                    .is_none()
                    .then_some(GameOverCause::BoardCleared)
            }
        };

        let game_over = cause.map(|cause| (cause, self.finish(now_ms)));

        Some(TickReport {
            tick: self.ticks,
            event: outcome.event,
            points: outcome.points,
            score: self.state.score,
            game_over,
        })
    }

    /// Run every tick that is due at `now_ms`, in order. Stops at the first
    /// terminal tick; ticks still owed at that point are dropped with the timer.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<TickReport> {
        let mut reports = Vec::new();
        while self.state.status == SessionStatus::Running && self.timer.poll(now_ms) {
            let Some(report) = self.tick(now_ms) else {
                break;
            };
            let finished = report.game_over.is_some();
            reports.push(report);
            if finished {
                break;
            }
        }
        reports
    }

    /// Detach from the host: cancel the timer and ignore every later call.
    pub fn teardown(&mut self) {
        self.timer.stop();
        self.terminated = true;
    }

    // The only place a RunResult is produced, so submission happens once per run.
    fn finish(&mut self, now_ms: u64) -> RunResult {
        self.timer.stop();
        self.state.status = SessionStatus::GameOver;
        RunResult {
            score: self.state.score,
            finished_at_ms: now_ms,
        }
    }
}
