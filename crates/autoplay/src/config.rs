use bingo_core::RoundConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopCondition {
    FirstLine,
    FirstFullHouse,
    Exhausted,
}

impl FromStr for StopCondition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "line" | "first-line" => Ok(Self::FirstLine),
            "full-house" | "house" | "first-full-house" => Ok(Self::FirstFullHouse),
            "exhausted" | "all" => Ok(Self::Exhausted),
            other => Err(format!("unknown stop condition {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub seed: u64,
    pub round: RoundConfig,
    pub stop: StopCondition,
    /// Pause once this many numbers have been called.
    pub pause_after_calls: Option<usize>,
    pub pause_ms: u64,
    pub max_ticks: u32,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            round: RoundConfig::default(),
            stop: StopCondition::FirstFullHouse,
            pause_after_calls: None,
            pause_ms: 3000,
            max_ticks: 10_000,
        }
    }
}
