use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::clock::DEFAULT_BUDGET_SECS;
use crate::delegate::{DelegateOracle, DEFAULT_TIMEOUT};
use crate::validator::Validator;

pub const ENV_DELEGATE: &str = "CHESS_REFEREE_DELEGATE";
pub const ENV_DELEGATE_TIMEOUT: &str = "CHESS_REFEREE_DELEGATE_TIMEOUT";
pub const ENV_TIME_BUDGET: &str = "CHESS_REFEREE_TIME_BUDGET";

/// Engine settings. Missing fields in a JSON document take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path of the external validation program. `None` means local rules only.
    pub delegate_path: Option<PathBuf>,
    /// How long to wait for the delegate before falling back.
    pub delegate_timeout_secs: u64,
    /// Starting time per player, in seconds.
    pub time_budget_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            delegate_path: None,
            delegate_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            time_budget_secs: DEFAULT_BUDGET_SECS,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Defaults overlaid with any `CHESS_REFEREE_*` environment variables.
    pub fn from_env() -> Self {
        Self::new().overlay(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup. Values that do not parse are ignored.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_DELEGATE).filter(|p| !p.trim().is_empty()) {
            self.delegate_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(secs) = parse_secs(&lookup, ENV_DELEGATE_TIMEOUT) {
            self.delegate_timeout_secs = secs;
        }
        if let Some(secs) = parse_secs(&lookup, ENV_TIME_BUDGET) {
            self.time_budget_secs = secs;
        }
        self
    }

    pub fn delegate_timeout(&self) -> Duration {
        Duration::from_secs(self.delegate_timeout_secs)
    }

    /// Build the validator this configuration describes.
    pub fn validator(&self) -> Validator {
        match &self.delegate_path {
            Some(path) => Validator::with_delegate(Box::new(DelegateOracle::process(
                path.clone(),
                self.delegate_timeout(),
            ))),
            None => Validator::local(),
        }
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
