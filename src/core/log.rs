//! Log sink implementations.
//!
//! The scheduler recovers callback errors locally and reports them through an
//! injected sink so a single misbehaving process can never abort a tick pass.
//! Sinks are the only channel through which the host observes those errors.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Destination for recovered callback errors and scheduler diagnostics.
pub trait LogSink {
    /// Record one diagnostic line.
    fn record(&mut self, line: String);
}

/// Bounded in-memory sink for tests and operator display panels.
///
/// Clones share the same buffer, so a test can keep a handle while the
/// scheduler owns another.
#[derive(Clone)]
pub struct InMemoryLogSink {
    lines: Rc<RefCell<VecDeque<String>>>,
    max_lines: usize,
}

impl InMemoryLogSink {
    /// Create a sink keeping at most `max_lines` recent lines.
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Rc::new(RefCell::new(VecDeque::with_capacity(max_lines))),
            max_lines,
        }
    }

    /// Snapshot of the stored lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().iter().cloned().collect()
    }

    /// Number of stored lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    /// Whether no lines have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl LogSink for InMemoryLogSink {
    fn record(&mut self, line: String) {
        if self.max_lines == 0 {
            return;
        }
        let mut lines = self.lines.borrow_mut();
        if lines.len() >= self.max_lines {
            lines.pop_front();
        }
        lines.push_back(line);
    }
}

/// Sink forwarding every line to `tracing` at warn level.
///
/// Installed by default so recovered errors stay visible without any setup.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn record(&mut self, line: String) {
        tracing::warn!("{line}");
    }
}
