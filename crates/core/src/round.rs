//! Round state machine: countdown, timed extraction with pause/resume, finish.
//!
//! The engine never waits on its own. A scheduler delivers countdown and
//! extraction ticks, a rendering surface delivers pause, speed and claim
//! commands, and each signal is processed to completion before the next one.
//! Every transition replaces the owned [`RoundState`] with a new value, so a
//! snapshot handed out earlier never changes under its reader.

use crate::{
    validate_card_count, Card, CardProgress, ConfigError, Event, EventBus, ExtractInterval,
    ExtractionOrder, RngState, RoundConfig,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct RoundToken(pub u64);

impl RoundToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RoundToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Countdown { remaining: u32 },
    Extracting,
    Paused,
    Finished,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Self::Countdown { .. } => "countdown",
            Self::Extracting => "extracting",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    CountdownTick,
    ExtractionTick,
    TogglePause,
    SetInterval(ExtractInterval),
    SetCardCount(usize),
    Restart,
}

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("{signal:?} not allowed while {phase:?}")]
    InvalidTransition { signal: Signal, phase: Phase },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaimVerdict {
    FullHouse,
    Line { rows: Vec<usize> },
    NotYet,
}

impl fmt::Display for ClaimVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullHouse => f.write_str("full house"),
            Self::Line { rows } => {
                let rows: Vec<String> = rows.iter().map(|row| (row + 1).to_string()).collect();
                write!(f, "line on row {}", rows.join(", "))
            }
            Self::NotYet => f.write_str("not yet"),
        }
    }
}

/// Read-only view of a round at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundState {
    pub token: RoundToken,
    pub phase: Phase,
    pub extraction_order: ExtractionOrder,
    pub current_index: Option<usize>,
    pub extract_interval: ExtractInterval,
    pub card_count: usize,
    pub max_numbers: u8,
}

impl RoundState {
    /// Numbers called so far, in call order.
    pub fn calls(&self) -> &[u8] {
        match self.current_index {
            Some(index) => self.extraction_order.prefix(index + 1),
            None => &[],
        }
    }

    pub fn called_numbers(&self) -> BTreeSet<u8> {
        self.calls().iter().copied().collect()
    }

    pub fn current_number(&self) -> Option<u8> {
        self.current_index
            .and_then(|index| self.extraction_order.number_at(index))
    }

    pub fn calls_made(&self) -> usize {
        self.current_index.map_or(0, |index| index + 1)
    }

    pub fn is_matched(&self, number: u8) -> bool {
        number > 0 && self.call_index(number).is_some()
    }

    /// Position in the draw at which `number` was called, if it has been.
    pub fn call_index(&self, number: u8) -> Option<usize> {
        let current = self.current_index?;
        self.extraction_order
            .position_of(number)
            .filter(|&index| index <= current)
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        match self.phase {
            Phase::Countdown { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.phase, Phase::Countdown { .. })
    }

    /// Round the visible tickets belong to. During a countdown that is the
    /// round about to start.
    pub fn ticket_token(&self) -> RoundToken {
        if self.is_started() {
            self.token
        } else {
            self.token.next()
        }
    }
}

#[derive(Debug)]
pub struct RoundEngine {
    config: RoundConfig,
    rng: RngState,
    state: RoundState,
    events: EventBus,
}

impl RoundEngine {
    pub fn new(config: RoundConfig, rng: RngState) -> Result<Self, RoundError> {
        config.validate()?;
        let state = RoundState {
            token: RoundToken::default(),
            phase: Phase::Countdown {
                remaining: config.initial_countdown_seconds,
            },
            extraction_order: ExtractionOrder::default(),
            current_index: None,
            extract_interval: config.extract_interval,
            card_count: config.card_count,
            max_numbers: config.max_numbers,
        };
        Ok(Self {
            config,
            rng,
            state,
            events: EventBus::default(),
        })
    }

    pub fn with_seed(config: RoundConfig, seed: u64) -> Result<Self, RoundError> {
        Self::new(config, RngState::from_seed(seed))
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn snapshot(&self) -> RoundState {
        self.state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain()
    }

    /// Strict entry point: out-of-phase signals come back as
    /// [`RoundError::InvalidTransition`] and leave the state untouched.
    pub fn apply(&mut self, signal: Signal) -> Result<RoundState, RoundError> {
        let next = match signal {
            Signal::CountdownTick => self.next_countdown(signal)?,
            Signal::ExtractionTick => self.next_extraction(signal)?,
            Signal::TogglePause => self.next_pause(signal)?,
            Signal::SetInterval(interval) => {
                self.events.push(Event::IntervalChanged { interval });
                RoundState {
                    extract_interval: interval,
                    ..self.state.clone()
                }
            }
            Signal::SetCardCount(count) => {
                let count = validate_card_count(count)?;
                self.events.push(Event::CardCountChanged { count });
                RoundState {
                    card_count: count,
                    ..self.state.clone()
                }
            }
            Signal::Restart => {
                let remaining = self.config.initial_countdown_seconds;
                self.events.push(Event::RoundRestarted {
                    countdown: remaining,
                });
                RoundState {
                    phase: Phase::Countdown { remaining },
                    extraction_order: ExtractionOrder::default(),
                    current_index: None,
                    ..self.state.clone()
                }
            }
        };
        self.state = next;
        Ok(self.snapshot())
    }

    pub fn tick_countdown(&mut self) -> RoundState {
        self.apply_lenient(Signal::CountdownTick)
    }

    pub fn tick_extraction(&mut self) -> RoundState {
        self.apply_lenient(Signal::ExtractionTick)
    }

    pub fn toggle_pause(&mut self) -> RoundState {
        self.apply_lenient(Signal::TogglePause)
    }

    /// Takes effect on the next scheduled tick; schedules nothing by itself.
    pub fn set_extract_interval(&mut self, interval: ExtractInterval) -> RoundState {
        self.apply_lenient(Signal::SetInterval(interval))
    }

    pub fn set_card_count(&mut self, count: usize) -> Result<RoundState, RoundError> {
        self.apply(Signal::SetCardCount(count))
    }

    pub fn restart(&mut self) -> RoundState {
        self.apply_lenient(Signal::Restart)
    }

    pub fn called_numbers(&self) -> BTreeSet<u8> {
        self.state.called_numbers()
    }

    pub fn is_matched(&self, number: u8) -> bool {
        self.state.is_matched(number)
    }

    pub fn card_progress(&self, card: &Card) -> CardProgress {
        card.progress(&self.called_numbers())
    }

    /// Matched flag per cell, in the card's column-major order.
    pub fn matched_cells(&self, card: &Card) -> Vec<bool> {
        card.cells()
            .iter()
            .map(|cell| self.is_matched(cell.value()))
            .collect()
    }

    /// A player calls Bingo on one ticket: extraction pauses so the claim can
    /// be checked, then the verdict is reported.
    pub fn claim(&mut self, ticket: usize, card: &Card) -> ClaimVerdict {
        if self.state.phase == Phase::Extracting {
            self.toggle_pause();
        }
        let called = self.called_numbers();
        let verdict = if card.is_full_house(&called) {
            ClaimVerdict::FullHouse
        } else {
            let rows = card.completed_rows(&called);
            if rows.is_empty() {
                ClaimVerdict::NotYet
            } else {
                ClaimVerdict::Line { rows }
            }
        };
        info!("ticket {ticket} claimed bingo: {verdict:?}");
        self.events.push(Event::BingoClaimed {
            ticket,
            verdict: verdict.clone(),
        });
        verdict
    }

    fn apply_lenient(&mut self, signal: Signal) -> RoundState {
        match self.apply(signal) {
            Ok(state) => state,
            Err(err) => {
                debug!("ignored signal: {err}");
                self.snapshot()
            }
        }
    }

    fn next_countdown(&mut self, signal: Signal) -> Result<RoundState, RoundError> {
        let Phase::Countdown { remaining } = self.state.phase else {
            return Err(self.invalid(signal));
        };
        if remaining > 1 {
            let remaining = remaining - 1;
            self.events.push(Event::CountdownTicked { remaining });
            return Ok(RoundState {
                phase: Phase::Countdown { remaining },
                ..self.state.clone()
            });
        }
        self.events.push(Event::CountdownTicked { remaining: 0 });
        Ok(self.start_round())
    }

    fn start_round(&mut self) -> RoundState {
        let max_numbers = self.state.max_numbers;
        let token = self.state.token.next();
        let extraction_order = ExtractionOrder::generate(max_numbers, &mut self.rng);
        info!("round {token} started with {max_numbers} numbers");
        self.events.push(Event::RoundStarted { token, max_numbers });
        let mut next = RoundState {
            token,
            phase: Phase::Extracting,
            extraction_order,
            current_index: Some(0),
            ..self.state.clone()
        };
        self.push_call(&next);
        if next.calls_made() >= usize::from(max_numbers) {
            next.phase = Phase::Finished;
            self.push_finished(&next);
        }
        next
    }

    fn next_extraction(&mut self, signal: Signal) -> Result<RoundState, RoundError> {
        if self.state.phase != Phase::Extracting {
            return Err(self.invalid(signal));
        }
        let max = usize::from(self.state.max_numbers);
        let index = self.state.current_index.unwrap_or(0);
        let mut next = self.state.clone();
        if index + 1 < max {
            next.current_index = Some(index + 1);
            self.push_call(&next);
            if index + 2 == max {
                next.phase = Phase::Finished;
                self.push_finished(&next);
            }
        } else {
            next.phase = Phase::Finished;
            self.push_finished(&next);
        }
        Ok(next)
    }

    fn next_pause(&mut self, signal: Signal) -> Result<RoundState, RoundError> {
        let index = self.state.current_index.unwrap_or(0);
        let phase = match self.state.phase {
            Phase::Extracting => {
                self.events.push(Event::Paused { index });
                Phase::Paused
            }
            Phase::Paused => {
                self.events.push(Event::Resumed { index });
                Phase::Extracting
            }
            _ => return Err(self.invalid(signal)),
        };
        Ok(RoundState {
            phase,
            ..self.state.clone()
        })
    }

    fn push_call(&mut self, state: &RoundState) {
        if let (Some(index), Some(number)) = (state.current_index, state.current_number()) {
            debug!("round {} call {} -> {}", state.token, index + 1, number);
            self.events.push(Event::NumberCalled {
                token: state.token,
                index,
                number,
            });
        }
    }

    fn push_finished(&mut self, state: &RoundState) {
        info!("round {} finished after {} calls", state.token, state.calls_made());
        self.events.push(Event::RoundFinished {
            token: state.token,
            calls: state.calls_made(),
        });
    }

    fn invalid(&self, signal: Signal) -> RoundError {
        RoundError::InvalidTransition {
            signal,
            phase: self.state.phase,
        }
    }
}
