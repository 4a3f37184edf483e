//! Infrastructure adapters around the scheduler core.

pub mod save;

pub use save::{SaveHook, SaveSink};
