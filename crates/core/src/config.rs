use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Highest number printed on a card and the largest supported draw.
pub const MAX_BALL: u8 = 90;
pub const MAX_CARD_COUNT: usize = 12;

pub const EXTRACT_INTERVAL_SLOW_MS: u64 = 7500;
pub const EXTRACT_INTERVAL_FAST_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max numbers must be between 1 and 90, got {0}")]
    MaxNumbersOutOfRange(u32),
    #[error("card count must be between 1 and 12, got {0}")]
    CardCountOutOfRange(usize),
    #[error("unknown extract interval {0:?}")]
    UnknownInterval(String),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExtractInterval {
    #[default]
    Slow,
    Fast,
}

impl ExtractInterval {
    pub fn as_millis(self) -> u64 {
        match self {
            Self::Slow => EXTRACT_INTERVAL_SLOW_MS,
            Self::Fast => EXTRACT_INTERVAL_FAST_MS,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }

    pub fn from_millis(ms: u64) -> Result<Self, ConfigError> {
        match ms {
            EXTRACT_INTERVAL_SLOW_MS => Ok(Self::Slow),
            EXTRACT_INTERVAL_FAST_MS => Ok(Self::Fast),
            other => Err(ConfigError::UnknownInterval(format!("{other}ms"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Fast => "fast",
        }
    }
}

impl fmt::Display for ExtractInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractInterval {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "fast" => Ok(Self::Fast),
            other => other
                .parse::<u64>()
                .map_err(|_| ConfigError::UnknownInterval(value.to_string()))
                .and_then(Self::from_millis),
        }
    }
}

/// How filled cells are spread across the three rows of a card.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardLayout {
    /// Each column picks its rows independently; rows are not guaranteed five numbers.
    #[default]
    Scattered,
    /// Every row holds exactly five numbers.
    Balanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundConfig {
    pub max_numbers: u8,
    pub initial_countdown_seconds: u32,
    pub extract_interval: ExtractInterval,
    pub card_count: usize,
    #[serde(default)]
    pub card_layout: CardLayout,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_numbers: MAX_BALL,
            initial_countdown_seconds: 10,
            extract_interval: ExtractInterval::Slow,
            card_count: 2,
            card_layout: CardLayout::Scattered,
            seed: None,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_max_numbers(u32::from(self.max_numbers))?;
        validate_card_count(self.card_count)?;
        Ok(())
    }
}

pub fn validate_max_numbers(value: u32) -> Result<u8, ConfigError> {
    if value == 0 || value > u32::from(MAX_BALL) {
        return Err(ConfigError::MaxNumbersOutOfRange(value));
    }
    Ok(value as u8)
}

pub fn validate_card_count(value: usize) -> Result<usize, ConfigError> {
    if value == 0 || value > MAX_CARD_COUNT {
        return Err(ConfigError::CardCountOutOfRange(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RoundConfig::default();
        assert_eq!(config.max_numbers, 90);
        assert_eq!(config.initial_countdown_seconds, 10);
        assert_eq!(config.extract_interval, ExtractInterval::Slow);
        assert_eq!(config.card_count, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_numbers() {
        let config = RoundConfig {
            max_numbers: 0,
            ..RoundConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaxNumbersOutOfRange(0))
        );
    }

    #[test]
    fn rejects_out_of_range_card_count() {
        assert!(validate_card_count(0).is_err());
        assert!(validate_card_count(MAX_CARD_COUNT + 1).is_err());
        assert_eq!(validate_card_count(4), Ok(4));
    }

    #[test]
    fn parses_interval_names_and_millis() {
        assert_eq!("slow".parse::<ExtractInterval>(), Ok(ExtractInterval::Slow));
        assert_eq!(" FAST ".parse::<ExtractInterval>(), Ok(ExtractInterval::Fast));
        assert_eq!("5000".parse::<ExtractInterval>(), Ok(ExtractInterval::Fast));
        assert!(matches!(
            "medium".parse::<ExtractInterval>(),
            Err(ConfigError::UnknownInterval(_))
        ));
        assert!(ExtractInterval::from_millis(1234).is_err());
    }

    #[test]
    fn interval_durations() {
        assert_eq!(ExtractInterval::Slow.as_duration(), Duration::from_millis(7500));
        assert_eq!(ExtractInterval::Fast.as_duration(), Duration::from_millis(5000));
    }
}
