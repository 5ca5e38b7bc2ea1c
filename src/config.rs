use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::kernel::error::ConfigError;

pub const CLARIFICATION_TEXT: &str = "I didn't quite catch that. Could you repeat?";
pub const ACKNOWLEDGEMENT_TEXT: &str = "Okay, got it.";

/// Thresholds and canned texts for the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// User moves below this confidence make the turn unintelligible.
    pub low_confidence_threshold: f32,
    /// Answers strictly above this confidence get acknowledged.
    pub acknowledge_threshold: f32,
    /// Consecutive silent turns before falling back to a default answer.
    pub escalation_threshold: u32,
    /// Safety ceiling on rule firings in one cycle.
    pub max_firings_per_turn: usize,
    pub clarification_text: String,
    pub acknowledgement_text: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.7,
            acknowledge_threshold: 0.9,
            escalation_threshold: 3,
            max_firings_per_turn: 256,
            clarification_text: CLARIFICATION_TEXT.to_string(),
            acknowledgement_text: ACKNOWLEDGEMENT_TEXT.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("low_confidence_threshold", self.low_confidence_threshold),
            ("acknowledge_threshold", self.acknowledge_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        if self.escalation_threshold == 0 {
            return Err(ConfigError::Invalid("escalation_threshold must be at least 1".to_string()));
        }
        if self.max_firings_per_turn == 0 {
            return Err(ConfigError::Invalid("max_firings_per_turn must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub const NO_INPUT_TIMEOUT_ENV: &str = "ISU_NO_INPUT_TIMEOUT_MS";

/// Settings for the console driver, the layer that turns waiting into `no_input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub no_input_timeout_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { no_input_timeout_ms: 8_000 }
    }
}

impl DriverConfig {
    /// Reads overrides from the environment, falling back to defaults on bad values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(NO_INPUT_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.no_input_timeout_ms = ms,
                _ => tracing::warn!("Ignoring {}={:?}: expected a positive integer", NO_INPUT_TIMEOUT_ENV, raw),
            }
        }
        config
    }

    pub fn no_input_timeout(&self) -> Duration {
        Duration::from_millis(self.no_input_timeout_ms)
    }
}
