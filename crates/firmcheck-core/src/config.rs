//! Engine configuration.
//!
//! Every knob has a default matching the behavior of the interactive
//! workbench. Values can be overridden from a JSON file; missing fields
//! keep their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of entries retained by either log buffer.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Upper bound for any configured delay or interval: one hour.
pub const MAX_DELAY_MS: u64 = 3_600_000;

/// Top-level configuration for the timed processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sequencer: SequencerConfig,
    pub simulator: SimulatorConfig,
}

impl EngineConfig {
    /// Load a configuration file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Override both seeds, e.g. from a `--seed` flag.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sequencer.seed = Some(seed);
        self.simulator.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sequencer.validate()?;
        self.simulator.validate()
    }
}

/// Verification sequencer timing.
///
/// The per-step delay is cosmetic: it is drawn uniformly from
/// `[step_delay_min_ms, step_delay_min_ms + step_delay_jitter_ms]` and has no
/// influence on check outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    pub step_delay_min_ms: u64,
    pub step_delay_jitter_ms: u64,
    pub log_capacity: usize,
    pub seed: Option<u64>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            step_delay_min_ms: 800,
            step_delay_jitter_ms: 500,
            log_capacity: DEFAULT_LOG_CAPACITY,
            seed: None,
        }
    }
}

impl SequencerConfig {
    pub fn step_delay_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.step_delay_min_ms),
            Duration::from_millis(self.step_delay_min_ms.saturating_add(self.step_delay_jitter_ms)),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_delay_min_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "sequencer.step_delay_min_ms",
                reason: "step delay must be non-zero".into(),
            });
        }
        let longest = self
            .step_delay_min_ms
            .checked_add(self.step_delay_jitter_ms)
            .filter(|ms| *ms <= MAX_DELAY_MS);
        if longest.is_none() {
            return Err(ConfigError::Invalid {
                field: "sequencer.step_delay_jitter_ms",
                reason: format!("step delay plus jitter exceeds {MAX_DELAY_MS} ms"),
            });
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "sequencer.log_capacity",
                reason: "log capacity must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Runtime simulator timing and activity model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub tick_interval_ms: u64,
    pub boot_delay_ms: u64,
    /// Chance per tick that one digital output is rewritten.
    pub flip_probability: f64,
    /// Waveform phase wraps at this value.
    pub phase_modulus: u32,
    pub log_capacity: usize,
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            boot_delay_ms: 1000,
            flip_probability: 0.2,
            phase_modulus: 100,
            log_capacity: DEFAULT_LOG_CAPACITY,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn boot_delay(&self) -> Duration {
        Duration::from_millis(self.boot_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "simulator.tick_interval_ms",
                reason: "tick interval must be non-zero".into(),
            });
        }
        if self.tick_interval_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid {
                field: "simulator.tick_interval_ms",
                reason: format!("{} ms exceeds {MAX_DELAY_MS} ms", self.tick_interval_ms),
            });
        }
        if self.boot_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid {
                field: "simulator.boot_delay_ms",
                reason: format!("{} ms exceeds {MAX_DELAY_MS} ms", self.boot_delay_ms),
            });
        }
        if !(0.0..=1.0).contains(&self.flip_probability) {
            return Err(ConfigError::Invalid {
                field: "simulator.flip_probability",
                reason: format!("{} is outside [0, 1]", self.flip_probability),
            });
        }
        if self.phase_modulus == 0 {
            return Err(ConfigError::Invalid {
                field: "simulator.phase_modulus",
                reason: "phase modulus must be at least 1".into(),
            });
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "simulator.log_capacity",
                reason: "log capacity must be at least 1".into(),
            });
        }
        Ok(())
    }
}
