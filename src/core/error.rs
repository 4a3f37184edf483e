//! Error types for scheduler operations.

use thiserror::Error;

use crate::core::process::Pid;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Spawning from a process that has already finished.
    #[error("process {0} is dead")]
    DeadProcess(String),
    /// Operation addressed a process id with no live node.
    #[error("unknown process {0}")]
    UnknownProcess(Pid),
    /// A value handed to the save sink could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
///
/// Process callbacks return this so domain code can bubble arbitrary errors
/// up to the scheduler, which recovers them at the invocation site.
pub type AppResult<T> = Result<T, anyhow::Error>;
