//! Scheduler configuration structures.

use serde::{Deserialize, Serialize};

/// Log sink backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogBackendConfig {
    /// Bounded in-memory buffer, readable by the host.
    InMemory,
    /// Forward recovered errors to `tracing`.
    Tracing,
    /// Drop recovered errors silently.
    Disabled,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Spread newly admitted same-period processes over distinct counter
    /// offsets to avoid co-firing load spikes.
    #[serde(default = "default_smart_phase")]
    pub smart_phase: bool,
    /// Buffer size when the in-memory log backend is selected.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    /// Log sink backend selection.
    #[serde(default = "default_log_backend")]
    pub log_backend: LogBackendConfig,
}

const fn default_smart_phase() -> bool {
    true
}

const fn default_log_capacity() -> usize {
    256
}

const fn default_log_backend() -> LogBackendConfig {
    LogBackendConfig::Tracing
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            smart_phase: default_smart_phase(),
            log_capacity: default_log_capacity(),
            log_backend: default_log_backend(),
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.log_backend == LogBackendConfig::InMemory && self.log_capacity == 0 {
            return Err("log_capacity must be greater than 0 for the in-memory backend".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
