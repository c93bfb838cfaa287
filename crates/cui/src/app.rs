use anyhow::{Context, Result};
use bingo_core::{
    Card, CardGenerator, CardProgress, Event, ExtractInterval, IntervalScheduler, RoundConfig,
    RoundEngine, RoundState, RoundToken, Scheduler, TickKind,
};
use log::{debug, warn};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_SEED: u64 = 0xB1A60;
const MAX_EVENT_LOG: usize = 200;

pub struct App {
    pub seed: u64,
    pub engine: RoundEngine,
    pub scheduler: IntervalScheduler,
    pub generator: CardGenerator,
    pub tickets: Vec<Card>,
    dealt: Option<(RoundToken, usize)>,
    pub focused_ticket: usize,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
    started: Instant,
}

impl App {
    pub fn bootstrap(config: RoundConfig, seed: u64) -> Result<Self> {
        let generator = CardGenerator::new(config.card_layout);
        let engine = RoundEngine::with_seed(config, seed).context("create round")?;
        let mut app = Self {
            seed,
            engine,
            scheduler: IntervalScheduler::new(),
            generator,
            tickets: Vec::new(),
            dealt: None,
            focused_ticket: 0,
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            should_quit: false,
            started: Instant::now(),
        };
        app.push_event_line(format!("seed {seed}"));
        app.after_transition(Duration::ZERO);
        Ok(app)
    }

    pub fn state(&self) -> &RoundState {
        self.engine.state()
    }

    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn on_tick(&mut self) {
        let now = self.now();
        self.advance(now);
    }

    /// Delivers the tick due at `now`, if there is one.
    pub fn advance(&mut self, now: Duration) -> Option<TickKind> {
        let kind = self.scheduler.poll(now)?;
        match kind {
            TickKind::Countdown => self.engine.tick_countdown(),
            TickKind::Extraction => self.engine.tick_extraction(),
        };
        self.after_transition(now);
        Some(kind)
    }

    /// Time until the next scheduled tick.
    pub fn next_tick_in(&self) -> Option<Duration> {
        self.scheduler.remaining(self.now())
    }

    pub fn toggle_pause(&mut self) {
        if !self.state().is_started() {
            self.push_status("round has not started");
            return;
        }
        let state = self.engine.toggle_pause();
        self.push_status(format!("round {}", state.phase.name()));
        self.after_transition(self.now());
    }

    pub fn set_interval(&mut self, interval: ExtractInterval) {
        self.engine.set_extract_interval(interval);
        self.push_status(format!("extract speed {interval}"));
        self.after_transition(self.now());
    }

    pub fn claim_focused(&mut self) {
        if !self.state().is_started() {
            self.push_status("nothing to claim yet");
            return;
        }
        let ticket = self.focused_ticket;
        let Some(card) = self.tickets.get(ticket).cloned() else {
            return;
        };
        let verdict = self.engine.claim(ticket, &card);
        self.push_status(format!("ticket {}: {verdict}", ticket + 1));
        self.after_transition(self.now());
    }

    pub fn cycle_ticket(&mut self, forward: bool) {
        let len = self.tickets.len();
        if len == 0 {
            return;
        }
        self.focused_ticket = if forward {
            (self.focused_ticket + 1) % len
        } else {
            (self.focused_ticket + len - 1) % len
        };
    }

    pub fn change_card_count(&mut self, delta: i32) {
        let current = self.state().card_count as i64;
        let wanted = (current + i64::from(delta)).max(0) as usize;
        match self.engine.set_card_count(wanted) {
            Ok(state) => self.push_status(format!("{} tickets", state.card_count)),
            Err(err) => {
                warn!("card count rejected: {err}");
                self.push_status(err.to_string());
            }
        }
        self.after_transition(self.now());
    }

    pub fn restart(&mut self) {
        self.engine.restart();
        self.push_status("new round");
        self.after_transition(self.now());
    }

    pub fn ticket_progress(&self, ticket: usize) -> Option<CardProgress> {
        self.tickets
            .get(ticket)
            .map(|card| self.engine.card_progress(card))
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    fn after_transition(&mut self, now: Duration) {
        let events: Vec<Event> = self.engine.drain_events().collect();
        for event in &events {
            self.push_event_line(format_event(event));
        }
        self.deal_tickets();
        self.scheduler.sync(self.engine.state(), now);
    }

    /// Tickets are a pure function of the round token and slot, so they are
    /// rebuilt only when either changes.
    fn deal_tickets(&mut self) {
        let state = self.engine.state();
        let key = (state.ticket_token(), state.card_count);
        if self.dealt == Some(key) {
            return;
        }
        let (token, count) = key;
        debug!("dealing {count} tickets for round {token}");
        self.tickets = (0..count)
            .map(|ticket| self.generator.ticket(self.seed, token, ticket))
            .collect();
        self.dealt = Some(key);
        self.focused_ticket = self.focused_ticket.min(count.saturating_sub(1));
    }

    fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}

pub fn format_event(event: &Event) -> String {
    match event {
        Event::CountdownTicked { remaining } => format!("countdown {remaining}"),
        Event::RoundStarted { token, max_numbers } => {
            format!("round {token} started, {max_numbers} numbers")
        }
        Event::NumberCalled { index, number, .. } => format!("ball {}: {number}", index + 1),
        Event::Paused { index } => format!("paused after ball {}", index + 1),
        Event::Resumed { index } => format!("resumed at ball {}", index + 1),
        Event::IntervalChanged { interval } => format!("speed {interval}"),
        Event::CardCountChanged { count } => format!("{count} tickets"),
        Event::RoundFinished { token, calls } => format!("round {token} finished after {calls}"),
        Event::RoundRestarted { countdown } => format!("restart, countdown {countdown}s"),
        Event::BingoClaimed { ticket, verdict } => {
            format!("bingo on ticket {}: {verdict}", ticket + 1)
        }
    }
}

/// Seconds as `mm:ss`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_core::{ClaimVerdict, Phase};

    fn app(countdown: u32, max_numbers: u8) -> App {
        let config = RoundConfig {
            initial_countdown_seconds: countdown,
            max_numbers,
            ..RoundConfig::default()
        };
        App::bootstrap(config, 17).expect("app")
    }

    #[test]
    fn tickets_are_dealt_before_the_round_starts() {
        let mut app = app(1, 90);
        assert_eq!(app.tickets.len(), 2);
        let before = app.tickets.clone();
        assert_eq!(app.advance(Duration::from_secs(1)), Some(TickKind::Countdown));
        assert_eq!(app.state().phase, Phase::Extracting);
        assert_eq!(app.tickets, before);
        assert_eq!(app.state().calls_made(), 1);
    }

    #[test]
    fn advance_waits_for_the_due_time() {
        let mut app = app(3, 90);
        assert_eq!(app.advance(Duration::from_millis(500)), None);
        assert_eq!(app.state().phase, Phase::Countdown { remaining: 3 });
        assert_eq!(app.advance(Duration::from_secs(1)), Some(TickKind::Countdown));
        assert_eq!(app.state().countdown_remaining(), Some(2));
    }

    #[test]
    fn pause_before_start_is_refused() {
        let mut app = app(5, 90);
        app.toggle_pause();
        assert_eq!(app.state().phase, Phase::Countdown { remaining: 5 });
        assert_eq!(app.status_line, "round has not started");
    }

    #[test]
    fn pause_stops_the_scheduler() {
        let mut app = app(0, 90);
        app.advance(Duration::from_secs(1));
        app.toggle_pause();
        assert_eq!(app.state().phase, Phase::Paused);
        assert_eq!(app.scheduler.armed(), None);
        app.toggle_pause();
        assert_eq!(app.state().phase, Phase::Extracting);
        assert!(app.scheduler.armed().is_some());
    }

    #[test]
    fn card_count_changes_redeal_and_clamp_focus() {
        let mut app = app(5, 90);
        app.change_card_count(1);
        assert_eq!(app.tickets.len(), 3);
        app.cycle_ticket(false);
        assert_eq!(app.focused_ticket, 2);
        app.change_card_count(-2);
        assert_eq!(app.tickets.len(), 1);
        assert_eq!(app.focused_ticket, 0);
        app.change_card_count(-1);
        assert_eq!(app.tickets.len(), 1);
        assert!(app.status_line.contains("between 1 and 12"));
    }

    #[test]
    fn claim_pauses_and_reports() {
        let mut app = app(0, 90);
        app.advance(Duration::from_secs(1));
        app.claim_focused();
        assert_eq!(app.state().phase, Phase::Paused);
        assert_eq!(app.status_line, "ticket 1: not yet");
        assert!(app
            .event_log
            .iter()
            .any(|line| line == "bingo on ticket 1: not yet"));
    }

    #[test]
    fn restart_deals_tickets_for_the_next_round() {
        let mut app = app(0, 90);
        app.advance(Duration::from_secs(1));
        let first = app.tickets.clone();
        app.restart();
        assert_eq!(app.state().phase, Phase::Countdown { remaining: 0 });
        assert_ne!(app.tickets, first);
    }

    #[test]
    fn event_log_is_bounded() {
        let mut app = app(5, 90);
        for _ in 0..(MAX_EVENT_LOG + 20) {
            app.set_interval(ExtractInterval::Fast);
        }
        assert_eq!(app.event_log.len(), MAX_EVENT_LOG);
    }

    #[test]
    fn formats_clock_and_claims() {
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(75), "01:15");
        let event = Event::BingoClaimed {
            ticket: 1,
            verdict: ClaimVerdict::Line { rows: vec![0, 2] },
        };
        assert_eq!(format_event(&event), "bingo on ticket 2: line on row 1, 3");
    }
}
