use crate::AutoplayError;
use bingo_core::{ClaimVerdict, ExtractInterval, CARD_COLS, CARD_ROWS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SimulationStatus {
    LineClaimed,
    FullHouseClaimed,
    Exhausted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRecord {
    pub index: usize,
    pub number: u8,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketRecord {
    pub ticket: usize,
    /// Column-major cell values, 0 for blanks.
    pub cells: Vec<u8>,
    #[serde(default)]
    pub first_line_at: Option<usize>,
    #[serde(default)]
    pub full_house_at: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRecord {
    pub ticket: usize,
    pub verdict: ClaimVerdict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationTrace {
    pub seed: u64,
    pub token: u64,
    pub status: SimulationStatus,
    pub phase: String,
    pub max_numbers: u8,
    pub interval: ExtractInterval,
    pub calls: Vec<CallRecord>,
    pub tickets: Vec<TicketRecord>,
    #[serde(default)]
    pub claim: Option<ClaimRecord>,
    pub paused_ms: u64,
    pub elapsed_ms: u64,
}

impl SimulationTrace {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("status: {}", status_label(self.status)),
            format!(
                "round: seed={} token=#{} phase={} interval={}",
                self.seed, self.token, self.phase, self.interval
            ),
            format!(
                "calls: {}/{} elapsed={}ms paused={}ms",
                self.calls.len(),
                self.max_numbers,
                self.elapsed_ms,
                self.paused_ms
            ),
        ];
        if let Some(claim) = self.claim.as_ref() {
            lines.push(format!("claim: ticket {} -> {}", claim.ticket + 1, claim.verdict));
        }
        lines.push(String::new());
        for ticket in &self.tickets {
            lines.push(format!(
                "ticket {}: line at {} | full house at {}",
                ticket.ticket + 1,
                call_label(ticket.first_line_at),
                call_label(ticket.full_house_at)
            ));
            push_grid(&mut lines, &ticket.cells);
        }
        lines.push(String::new());
        lines.push("calls:".to_string());
        for chunk in self.calls.chunks(15) {
            let row: Vec<String> = chunk.iter().map(|c| format!("{:>2}", c.number)).collect();
            lines.push(format!("  {}", row.join(" ")));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub first_seed: u64,
    pub rounds: u32,
    pub lines: u32,
    pub full_houses: u32,
    pub total_calls_to_line: u64,
    pub total_calls_to_full_house: u64,
    #[serde(default)]
    pub fastest_full_house: Option<usize>,
}

impl BatchSummary {
    pub fn new(first_seed: u64) -> Self {
        Self {
            first_seed,
            rounds: 0,
            lines: 0,
            full_houses: 0,
            total_calls_to_line: 0,
            total_calls_to_full_house: 0,
            fastest_full_house: None,
        }
    }

    pub fn record(&mut self, trace: &SimulationTrace) {
        self.rounds += 1;
        if let Some(calls) = trace.tickets.iter().filter_map(|t| t.first_line_at).min() {
            self.lines += 1;
            self.total_calls_to_line += calls as u64;
        }
        if let Some(calls) = trace.tickets.iter().filter_map(|t| t.full_house_at).min() {
            self.full_houses += 1;
            self.total_calls_to_full_house += calls as u64;
            self.fastest_full_house = Some(self.fastest_full_house.map_or(calls, |f| f.min(calls)));
        }
    }

    pub fn mean_calls_to_line(&self) -> Option<f64> {
        (self.lines > 0).then(|| self.total_calls_to_line as f64 / f64::from(self.lines))
    }

    pub fn mean_calls_to_full_house(&self) -> Option<f64> {
        (self.full_houses > 0)
            .then(|| self.total_calls_to_full_house as f64 / f64::from(self.full_houses))
    }

    pub fn to_text_report(&self) -> String {
        [
            format!("rounds: {} (seeds from {})", self.rounds, self.first_seed),
            format!(
                "first line: {} rounds, mean {} calls",
                self.lines,
                mean_label(self.mean_calls_to_line())
            ),
            format!(
                "full house: {} rounds, mean {} calls, fastest {}",
                self.full_houses,
                mean_label(self.mean_calls_to_full_house()),
                call_label(self.fastest_full_house)
            ),
        ]
        .join("\n")
    }
}

fn push_grid(lines: &mut Vec<String>, cells: &[u8]) {
    for row in 0..CARD_ROWS {
        let cols: Vec<String> = (0..CARD_COLS)
            .map(|col| match cells.get(col * CARD_ROWS + row).copied().unwrap_or(0) {
                0 => " .".to_string(),
                n => format!("{n:>2}"),
            })
            .collect();
        lines.push(format!("  {}", cols.join(" ")));
    }
}

fn call_label(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |calls| calls.to_string())
}

fn mean_label(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |mean| format!("{mean:.1}"))
}

fn status_label(status: SimulationStatus) -> &'static str {
    match status {
        SimulationStatus::LineClaimed => "line claimed",
        SimulationStatus::FullHouseClaimed => "full house claimed",
        SimulationStatus::Exhausted => "all numbers called",
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}
