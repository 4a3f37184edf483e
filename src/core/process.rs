//! Process identity, lifecycle state, and spawn parameters.
//!
//! A process is the smallest schedulable unit: a named, possibly periodic
//! action with an optional parent and an owned set of children. Processes are
//! stored in an arena inside the [`Scheduler`] and addressed externally by
//! their [`Pid`], which is unique for the scheduler's lifetime and never
//! reused.

use serde::{Deserialize, Serialize};

use crate::core::error::AppResult;
use crate::core::scheduler::{ProcessCtx, Scheduler};

/// Stable handle of a process.
///
/// Ids are assigned from a per-scheduler monotonic counter, so a `Pid` stays
/// valid as an address even after the process it named has finished:
/// operations on a finished id are silent no-ops (kill) or report an error
/// (spawning a child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pid(pub(crate) u32);

impl Pid {
    /// Numeric value of the id, for external bookkeeping and diagnostics.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final outcome of a process, reported to its `on_done` callback.
///
/// Starts as `Ok` and only ever moves away from it: `fail()` turns it into
/// `Failed`, `kill()` into `Killed`. It never returns to `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessResult {
    /// The process completed normally.
    Ok,
    /// The process signalled failure on itself before completing.
    Failed,
    /// The process was cancelled, directly or as part of a killed subtree.
    Killed,
}

impl std::fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Failed => write!(f, "failed"),
            Self::Killed => write!(f, "killed"),
        }
    }
}

/// Snapshot handed to an `on_done` callback once a process and all of its
/// children have finished.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Id of the finished process.
    pub pid: Pid,
    /// Name of the finished process.
    pub name: String,
    /// Final result.
    pub result: ProcessResult,
}

/// Periodic action of a process.
///
/// Invoked each time the process's counter reaches its period. The context
/// gives the action access to its own process and to spawning.
pub type Action = Box<dyn FnMut(&mut ProcessCtx<'_>) -> AppResult<()>>;

/// Completion callback of a process.
///
/// Runs exactly once, at the end of the lifecycle. Receives the scheduler so
/// completion handlers can spawn follow-up work.
pub type OnDone = Box<dyn FnOnce(&mut Scheduler, &Completion) -> AppResult<()>>;

/// Parameters for spawning a process.
///
/// ```
/// use tickproc::core::ProcessSpec;
///
/// let spec = ProcessSpec::named("solar-align")
///     .with_period(30)
///     .with_action(|_ctx| Ok(()));
/// ```
#[derive(Default)]
pub struct ProcessSpec {
    pub(crate) name: Option<String>,
    pub(crate) period: u32,
    pub(crate) use_once: bool,
    pub(crate) action: Option<Action>,
    pub(crate) on_done: Option<OnDone>,
}

impl ProcessSpec {
    /// Spec with defaults: anonymous name, period 1, repeating, no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            period: 1,
            ..Self::default()
        }
    }

    /// Spec with the given name and otherwise default parameters.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    /// Set the process name. Names need not be unique; they are used for
    /// bulk kills and diagnostics.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the tick interval between action invocations. Clamped to at
    /// least 1 when the process is created.
    #[must_use]
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Make the process finish itself after its first invocation.
    #[must_use]
    pub fn with_use_once(mut self, use_once: bool) -> Self {
        self.use_once = use_once;
        self
    }

    /// Set the periodic action. A spec without an action is a pure grouping
    /// process, useful purely as a parent for children.
    #[must_use]
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut ProcessCtx<'_>) -> AppResult<()> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Set the completion callback, run exactly once at end of lifecycle.
    #[must_use]
    pub fn with_on_done<F>(mut self, on_done: F) -> Self
    where
        F: FnOnce(&mut Scheduler, &Completion) -> AppResult<()> + 'static,
    {
        self.on_done = Some(Box::new(on_done));
        self
    }
}

/// Arena node backing one process.
pub(crate) struct ProcessNode {
    pub(crate) id: Pid,
    pub(crate) name: String,
    pub(crate) period: u32,
    pub(crate) use_once: bool,
    /// Ticks elapsed since the last invocation; `None` encodes inactive.
    pub(crate) counter: Option<u32>,
    pub(crate) result: ProcessResult,
    pub(crate) action: Option<Action>,
    pub(crate) on_done: Option<OnDone>,
    /// Non-owning back-reference, used only to notify completion upward.
    pub(crate) parent: Option<Pid>,
    /// Owned children, grown on spawn and shrunk as children finish.
    pub(crate) children: Vec<Pid>,
}

impl ProcessNode {
    /// Whether the process is still ticked and eligible to run its action.
    pub(crate) const fn is_active(&self) -> bool {
        self.counter.is_some()
    }

    /// Even when no longer active, a process stays alive while it has
    /// children that have not finished.
    pub(crate) fn is_alive(&self) -> bool {
        self.is_active() || !self.children.is_empty()
    }
}
