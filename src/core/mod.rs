//! Core process abstraction and the tick scheduler.

pub mod error;
pub mod log;
pub mod process;
pub mod scheduler;

pub use error::{AppResult, SchedulerError};
pub use log::{InMemoryLogSink, LogSink, TracingLogSink};
pub use process::{Action, Completion, OnDone, Pid, ProcessResult, ProcessSpec};
pub use scheduler::{ProcessCtx, Scheduler};
