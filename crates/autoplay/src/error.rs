use bingo_core::RoundError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoplayError {
    #[error("round error: {0}")]
    Round(String),
    #[error("simulation stalled after {0} ticks")]
    Stalled(u32),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<RoundError> for AutoplayError {
    fn from(value: RoundError) -> Self {
        Self::Round(value.to_string())
    }
}

impl From<std::io::Error> for AutoplayError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AutoplayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
