use bingo_core::{validate_max_numbers, CardLayout, ExtractInterval, RoundConfig};
use serde::{Deserialize, Serialize};

/// On-disk shape of a round config. Every field is optional and overlays
/// [`RoundConfig::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoundConfigFile {
    #[serde(default)]
    pub max_numbers: Option<u32>,
    #[serde(default)]
    pub initial_countdown_seconds: Option<u32>,
    /// `"slow"`, `"fast"`, or the interval in milliseconds.
    #[serde(default)]
    pub extract_interval: Option<IntervalValue>,
    #[serde(default)]
    pub card_count: Option<usize>,
    #[serde(default)]
    pub card_layout: Option<CardLayout>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntervalValue {
    Millis(u64),
    Name(String),
}

impl IntervalValue {
    pub fn resolve(&self) -> anyhow::Result<ExtractInterval> {
        let interval = match self {
            Self::Millis(ms) => ExtractInterval::from_millis(*ms)?,
            Self::Name(name) => name.parse()?,
        };
        Ok(interval)
    }
}

impl RoundConfigFile {
    pub fn into_config(self) -> anyhow::Result<RoundConfig> {
        let mut config = RoundConfig::default();
        if let Some(max) = self.max_numbers {
            config.max_numbers = validate_max_numbers(max)?;
        }
        if let Some(seconds) = self.initial_countdown_seconds {
            config.initial_countdown_seconds = seconds;
        }
        if let Some(interval) = self.extract_interval {
            config.extract_interval = interval.resolve()?;
        }
        if let Some(count) = self.card_count {
            config.card_count = count;
        }
        if let Some(layout) = self.card_layout {
            config.card_layout = layout;
        }
        config.seed = self.seed.or(config.seed);
        config.validate()?;
        Ok(config)
    }
}
