use crate::schema::RoundConfigFile;
use anyhow::Context;
use bingo_core::RoundConfig;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const ROUND_CONFIG_FILE: &str = "round.json";

pub fn load_round_config(path: &Path) -> anyhow::Result<RoundConfig> {
    let file: RoundConfigFile = load_json(path)?;
    let config = file
        .into_config()
        .with_context(|| format!("invalid config in {}", path.display()))?;
    debug!("loaded round config from {}: {config:?}", path.display());
    Ok(config)
}

/// Loads `path` when given, otherwise `$BINGO_CONFIG`, otherwise defaults.
pub fn load_round_config_or_default(path: Option<&Path>) -> anyhow::Result<RoundConfig> {
    match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_round_config(&path),
        None => Ok(RoundConfig::default()),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("BINGO_CONFIG").map(PathBuf::from)
}

pub fn parse_round_config(raw: &str) -> anyhow::Result<RoundConfig> {
    let file: RoundConfigFile = serde_json::from_str(raw).context("parse round config")?;
    file.into_config()
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
