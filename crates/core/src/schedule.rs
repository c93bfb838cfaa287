//! Tick scheduling, kept outside the round engine.
//!
//! Time is a `Duration` measured from any fixed origin. A terminal loop passes
//! `Instant::elapsed`, the headless simulator passes a virtual clock.

use crate::{Phase, RoundState};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TickKind {
    Countdown,
    Extraction,
}

/// Which tick a round in this state wants, and how often.
pub fn tick_plan(state: &RoundState) -> Option<(TickKind, Duration)> {
    match state.phase {
        Phase::Countdown { .. } => Some((TickKind::Countdown, COUNTDOWN_PERIOD)),
        Phase::Extracting => Some((TickKind::Extraction, state.extract_interval.as_duration())),
        Phase::Paused | Phase::Finished => None,
    }
}

pub trait Scheduler {
    /// Arms a repeating tick; the first one fires `period` after `now`.
    fn start(&mut self, kind: TickKind, period: Duration, now: Duration);

    fn stop(&mut self);

    fn armed(&self) -> Option<(TickKind, Duration)>;

    fn next_due(&self) -> Option<Duration>;

    /// Returns the tick due at `now`, if any, and re-arms it one period
    /// after its due time. A caller that fell a whole period behind restarts
    /// from `now` instead of receiving a burst of late ticks.
    fn poll(&mut self, now: Duration) -> Option<TickKind>;

    /// Brings the timer in line with the round after a transition. A tick
    /// that is already armed with the same kind and period keeps its due time.
    fn sync(&mut self, state: &RoundState, now: Duration) {
        match tick_plan(state) {
            Some((kind, period)) => {
                if self.armed() != Some((kind, period)) {
                    self.start(kind, period, now);
                }
            }
            None => self.stop(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    kind: TickKind,
    period: Duration,
    due: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct IntervalScheduler {
    armed: Option<Armed>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left until the next tick, saturating at zero.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.armed.map(|armed| armed.due.saturating_sub(now))
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, kind: TickKind, period: Duration, now: Duration) {
        debug!("arm {kind:?} tick every {}ms", period.as_millis());
        self.armed = Some(Armed {
            kind,
            period,
            due: now + period,
        });
    }

    fn stop(&mut self) {
        if let Some(armed) = self.armed.take() {
            debug!("stop {:?} tick", armed.kind);
        }
    }

    fn armed(&self) -> Option<(TickKind, Duration)> {
        self.armed.map(|armed| (armed.kind, armed.period))
    }

    fn next_due(&self) -> Option<Duration> {
        self.armed.map(|armed| armed.due)
    }

    fn poll(&mut self, now: Duration) -> Option<TickKind> {
        let armed = self.armed.as_mut()?;
        if now < armed.due {
            return None;
        }
        let next = armed.due + armed.period;
        armed.due = if now >= next { now + armed.period } else { next };
        Some(armed.kind)
    }
}
