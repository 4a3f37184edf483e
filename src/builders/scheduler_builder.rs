//! Builder to construct a scheduler from configuration.

use crate::config::{LogBackendConfig, SchedulerConfig};
use crate::core::{InMemoryLogSink, LogSink, Scheduler, SchedulerError, TracingLogSink};

/// Builds a [`Scheduler`] from a validated [`SchedulerConfig`], with an
/// optional caller-provided log sink overriding the configured backend.
#[derive(Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    sink: Option<Box<dyn LogSink>>,
}

impl SchedulerBuilder {
    /// Builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration.
    #[must_use]
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a custom log sink, overriding `config.log_backend`.
    #[must_use]
    pub fn with_log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration and build the scheduler.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        self.config.validate().map_err(SchedulerError::Config)?;
        let mut scheduler = Scheduler::new();
        scheduler.set_smart(self.config.smart_phase);
        match self.sink {
            Some(sink) => scheduler.set_log_sink(sink),
            None => match self.config.log_backend {
                LogBackendConfig::InMemory => {
                    scheduler.set_log_sink(Box::new(InMemoryLogSink::new(self.config.log_capacity)));
                }
                LogBackendConfig::Tracing => scheduler.set_log_sink(Box::new(TracingLogSink)),
                LogBackendConfig::Disabled => scheduler.clear_log_sink(),
            },
        }
        Ok(scheduler)
    }
}
