//! Structured key-value sink for the save fan-out.
//!
//! Subsystems register save hooks on the scheduler; on a save request every
//! hook writes its state into one shared sink, and the serialized result is
//! handed onward for storage across a save/reload boundary. The scheduler
//! never interprets the contents.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{AppResult, SchedulerError};

/// Callback registered by a subsystem to persist its state.
pub type SaveHook = Box<dyn FnMut(&mut SaveSink) -> AppResult<()>>;

/// Ordered section/key value store, rendered to JSON.
///
/// `BTreeMap` keeps the rendered output deterministic, so saved state is
/// stable across runs and diffable by operators.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveSink {
    sections: BTreeMap<String, BTreeMap<String, Value>>,
}

impl SaveSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a section and key, overwriting any previous
    /// value at that address.
    pub fn set<T: Serialize>(
        &mut self,
        section: &str,
        key: &str,
        value: T,
    ) -> Result<(), SchedulerError> {
        let value =
            serde_json::to_value(value).map_err(|e| SchedulerError::Serialize(e.to_string()))?;
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    /// Read a value back, for reload paths that reuse the sink format.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Serialize the sink to its stable JSON form.
    pub fn render(&self) -> Result<String, SchedulerError> {
        serde_json::to_string_pretty(&self.sections)
            .map_err(|e| SchedulerError::Serialize(e.to_string()))
    }

    /// Parse a previously rendered sink, for the reload side of the
    /// save/reload boundary.
    pub fn from_rendered(input: &str) -> Result<Self, SchedulerError> {
        let sections = serde_json::from_str(input)
            .map_err(|e| SchedulerError::Serialize(e.to_string()))?;
        Ok(Self { sections })
    }
}
