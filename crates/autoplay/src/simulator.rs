use crate::{
    AutoplayConfig, AutoplayError, BatchSummary, CallRecord, ClaimRecord, SimulationStatus,
    SimulationTrace, StopCondition, TicketRecord,
};
use bingo_core::{
    Card, CardGenerator, ClaimVerdict, Event, IntervalScheduler, Phase, RoundEngine, RoundToken,
    Scheduler, TickKind,
};
use log::{debug, info};
use std::time::Duration;

/// What one [`Simulator::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStep {
    Tick(TickKind),
    /// A scripted pause ended; nothing was called.
    Resumed,
    Idle,
}

#[derive(Debug)]
pub struct Simulator {
    config: AutoplayConfig,
    engine: RoundEngine,
    scheduler: IntervalScheduler,
    generator: CardGenerator,
    clock: Duration,
    ticks: u32,
    tickets: Vec<Card>,
    outcomes: Vec<TicketRecord>,
    calls: Vec<CallRecord>,
    paused_for: Duration,
    resume_at: Option<Duration>,
    pause_done: bool,
    claim: Option<(usize, ClaimVerdict)>,
}

impl Simulator {
    pub fn new(config: AutoplayConfig) -> Result<Self, AutoplayError> {
        let engine = RoundEngine::with_seed(config.round.clone(), config.seed)?;
        let generator = CardGenerator::new(config.round.card_layout);
        let mut scheduler = IntervalScheduler::new();
        scheduler.sync(engine.state(), Duration::ZERO);
        Ok(Self {
            config,
            engine,
            scheduler,
            generator,
            clock: Duration::ZERO,
            ticks: 0,
            tickets: Vec::new(),
            outcomes: Vec::new(),
            calls: Vec::new(),
            paused_for: Duration::ZERO,
            resume_at: None,
            pause_done: false,
            claim: None,
        })
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn tickets(&self) -> &[Card] {
        &self.tickets
    }

    /// Jumps the virtual clock to the next due tick and delivers it, or ends a
    /// scripted pause. [`SimStep::Idle`] means nothing is left to do.
    pub fn step(&mut self) -> Result<SimStep, AutoplayError> {
        if self.ticks >= self.config.max_ticks {
            return Err(AutoplayError::Stalled(self.ticks));
        }
        let Some(due) = self.scheduler.next_due() else {
            return Ok(if self.resume_if_pending() {
                SimStep::Resumed
            } else {
                SimStep::Idle
            });
        };
        self.clock = self.clock.max(due);
        let Some(kind) = self.scheduler.poll(self.clock) else {
            return Ok(SimStep::Idle);
        };
        self.ticks += 1;
        match kind {
            TickKind::Countdown => self.engine.tick_countdown(),
            TickKind::Extraction => self.engine.tick_extraction(),
        };
        self.absorb_events();
        self.pause_if_scripted();
        self.scheduler.sync(self.engine.state(), self.clock);
        Ok(SimStep::Tick(kind))
    }

    pub fn run(mut self) -> Result<SimulationTrace, AutoplayError> {
        let status = loop {
            if let Some(status) = self.stop_status() {
                break status;
            }
            if self.step()? == SimStep::Idle {
                break SimulationStatus::Exhausted;
            }
        };
        self.claim_winner(status);
        info!(
            "simulation seed {} ended {:?} after {} calls",
            self.config.seed,
            status,
            self.calls.len()
        );
        Ok(self.into_trace(status))
    }

    fn resume_if_pending(&mut self) -> bool {
        let Some(resume_at) = self.resume_at.take() else {
            return false;
        };
        if self.engine.phase() != Phase::Paused {
            return false;
        }
        self.paused_for += resume_at.saturating_sub(self.clock);
        self.clock = resume_at;
        self.engine.toggle_pause();
        self.absorb_events();
        self.scheduler.sync(self.engine.state(), self.clock);
        debug!("resumed at {}ms", self.clock.as_millis());
        true
    }

    fn pause_if_scripted(&mut self) {
        let Some(after) = self.config.pause_after_calls else {
            return;
        };
        if self.pause_done || self.engine.phase() != Phase::Extracting {
            return;
        }
        if self.engine.state().calls_made() >= after {
            self.pause_done = true;
            self.engine.toggle_pause();
            self.absorb_events();
            self.resume_at = Some(self.clock + Duration::from_millis(self.config.pause_ms));
        }
    }

    fn absorb_events(&mut self) {
        let events: Vec<Event> = self.engine.drain_events().collect();
        for event in events {
            match event {
                Event::RoundStarted { token, .. } => self.deal(token),
                Event::NumberCalled { index, number, .. } => {
                    self.calls.push(CallRecord {
                        index,
                        number,
                        at_ms: self.clock.as_millis() as u64,
                    });
                    self.mark_tickets();
                }
                other => debug!("event {other:?}"),
            }
        }
    }

    fn deal(&mut self, token: RoundToken) {
        let count = self.engine.state().card_count;
        self.tickets = (0..count)
            .map(|ticket| self.generator.ticket(self.config.seed, token, ticket))
            .collect();
        self.outcomes = self
            .tickets
            .iter()
            .enumerate()
            .map(|(ticket, card)| TicketRecord {
                ticket,
                cells: card.cells().iter().map(|cell| cell.value()).collect(),
                first_line_at: None,
                full_house_at: None,
            })
            .collect();
    }

    fn mark_tickets(&mut self) {
        let called = self.engine.called_numbers();
        let calls = called.len();
        for (card, outcome) in self.tickets.iter().zip(self.outcomes.iter_mut()) {
            if outcome.first_line_at.is_none() && !card.completed_rows(&called).is_empty() {
                outcome.first_line_at = Some(calls);
            }
            if outcome.full_house_at.is_none() && card.is_full_house(&called) {
                outcome.full_house_at = Some(calls);
            }
        }
    }

    fn stop_status(&self) -> Option<SimulationStatus> {
        let line = self.outcomes.iter().any(|o| o.first_line_at.is_some());
        let house = self.outcomes.iter().any(|o| o.full_house_at.is_some());
        match self.config.stop {
            StopCondition::FirstLine if line => return Some(SimulationStatus::LineClaimed),
            StopCondition::FirstFullHouse if house => {
                return Some(SimulationStatus::FullHouseClaimed)
            }
            _ => {}
        }
        (self.engine.phase() == Phase::Finished).then_some(SimulationStatus::Exhausted)
    }

    fn claim_winner(&mut self, status: SimulationStatus) {
        let winner = match status {
            SimulationStatus::LineClaimed => {
                self.outcomes.iter().position(|o| o.first_line_at.is_some())
            }
            SimulationStatus::FullHouseClaimed => {
                self.outcomes.iter().position(|o| o.full_house_at.is_some())
            }
            SimulationStatus::Exhausted => None,
        };
        if let Some(ticket) = winner {
            let verdict = self.engine.claim(ticket, &self.tickets[ticket]);
            self.absorb_events();
            self.claim = Some((ticket, verdict));
        }
    }

    fn into_trace(self, status: SimulationStatus) -> SimulationTrace {
        let state = self.engine.snapshot();
        SimulationTrace {
            seed: self.config.seed,
            token: state.token.0,
            status,
            phase: state.phase.name().to_string(),
            max_numbers: state.max_numbers,
            interval: state.extract_interval,
            calls: self.calls,
            tickets: self.outcomes,
            claim: self
                .claim
                .map(|(ticket, verdict)| ClaimRecord { ticket, verdict }),
            paused_ms: self.paused_for.as_millis() as u64,
            elapsed_ms: self.clock.as_millis() as u64,
        }
    }
}

pub fn simulate(config: AutoplayConfig) -> Result<SimulationTrace, AutoplayError> {
    Simulator::new(config)?.run()
}

/// Plays `rounds` full-house rounds on consecutive seeds starting at
/// `config.seed`.
pub fn run_batch(config: &AutoplayConfig, rounds: u32) -> Result<BatchSummary, AutoplayError> {
    let mut summary = BatchSummary::new(config.seed);
    for offset in 0..rounds {
        let mut round = config.clone();
        round.seed = config.seed.wrapping_add(u64::from(offset));
        round.stop = StopCondition::FirstFullHouse;
        let trace = simulate(round)?;
        summary.record(&trace);
    }
    Ok(summary)
}
