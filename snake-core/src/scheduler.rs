use std::time::Instant;

use crate::constants::TICK_INTERVAL_MS;

/// Millisecond time source for the tick loop.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Manually advanced clock for headless runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualClock {
    now_ms: u64,
}

impl VirtualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(ms);
        self.now_ms
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// Monotonic wall clock, measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
    }
}

/// Fixed-period tick timer with explicit start/stop.
///
/// The timer holds no callback. Owners poll it with the current time and run
/// one step per `true`. A stopped timer never reports a due tick, so nothing
/// can fire against state that has already left the running phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickTimer {
    period_ms: u64,
    next_due_ms: Option<u64>,
}

impl TickTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// (Re)arm the timer. Any previously scheduled tick is discarded.
    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.period_ms));
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Consume one due tick, if any.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if due <= now_ms => {
                self.next_due_ms = Some(due.saturating_add(self.period_ms));
                true
            }
            _ => false,
        }
    }

    /// Number of ticks that are due at `now_ms` without consuming them.
    pub fn pending(&self, now_ms: u64) -> u64 {
        match self.next_due_ms {
            Some(due) if due <= now_ms => (now_ms - due) / self.period_ms + 1,
            _ => 0,
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(TICK_INTERVAL_MS)
    }
}
