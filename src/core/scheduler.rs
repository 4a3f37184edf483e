//! Cooperative tick scheduler over a process arena.
//!
//! The host calls [`Scheduler::tick`] once per simulation step. Each pass
//! admits staged processes (optionally phase-shifting periodic ones so
//! same-period work spreads across the period window), advances every active
//! process's counter, invokes due actions, and prunes processes that are no
//! longer alive. Execution is strictly single-threaded and cooperative; the
//! scheduler carries no domain state, only the process tree.

use std::collections::{HashMap, HashSet};
use std::mem;

use crate::core::error::{AppResult, SchedulerError};
use crate::core::log::{LogSink, TracingLogSink};
use crate::core::process::{Completion, Pid, ProcessNode, ProcessResult, ProcessSpec};
use crate::infra::save::{SaveHook, SaveSink};

/// Manager of the process tree and the per-tick execution loop.
///
/// Processes are owned by an arena keyed by [`Pid`]; parent/child structure
/// is expressed through id handles, so external code addresses processes by
/// id without holding references into the scheduler.
pub struct Scheduler {
    nodes: HashMap<Pid, ProcessNode>,
    /// Admitted processes, in admission order. May hold ids of processes
    /// that finished since the last pruning pass.
    active: Vec<Pid>,
    /// Processes created since the last tick, awaiting admission.
    pending: Vec<Pid>,
    next_id: u32,
    smart_phase: bool,
    log_sink: Option<Box<dyn LogSink>>,
    save_hooks: Vec<SaveHook>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a scheduler with smart phase assignment enabled and a
    /// [`TracingLogSink`] installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            active: Vec::new(),
            pending: Vec::new(),
            next_id: 0,
            smart_phase: true,
            log_sink: Some(Box::new(TracingLogSink)),
            save_hooks: Vec::new(),
        }
    }

    /// Replace the log sink receiving recovered callback errors.
    pub fn set_log_sink(&mut self, sink: Box<dyn LogSink>) {
        self.log_sink = Some(sink);
    }

    /// Remove the log sink; recovered errors are then dropped silently.
    pub fn clear_log_sink(&mut self) {
        self.log_sink = None;
    }

    /// Toggle phase smoothing for newly admitted periodic processes.
    ///
    /// When enabled, a periodic process (period > 1, not use-once) admitted
    /// while other processes of the same period are running receives the
    /// smallest free counter offset, so same-period work fires on distinct
    /// ticks instead of spiking together.
    pub fn set_smart(&mut self, smart: bool) {
        self.smart_phase = smart;
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Create and stage a root process. It is admitted on the next tick.
    pub fn spawn(&mut self, spec: ProcessSpec) -> Pid {
        self.create(None, spec)
    }

    /// Create and stage a child of `parent`.
    ///
    /// Legal only while the parent is alive; spawning from a finished parent
    /// is a programming error in domain code and is surfaced synchronously.
    pub fn spawn_child(&mut self, parent: Pid, spec: ProcessSpec) -> Result<Pid, SchedulerError> {
        match self.nodes.get(&parent) {
            None => Err(SchedulerError::UnknownProcess(parent)),
            Some(node) if !node.is_alive() => Err(SchedulerError::DeadProcess(node.name.clone())),
            Some(_) => Ok(self.create(Some(parent), spec)),
        }
    }

    fn create(&mut self, parent: Option<Pid>, spec: ProcessSpec) -> Pid {
        self.next_id += 1;
        let pid = Pid(self.next_id);
        let name = match spec.name {
            Some(name) => name,
            None => parent
                .and_then(|p| self.nodes.get(&p))
                .map_or_else(|| "<anonymous>".to_string(), |p| format!("{}-child", p.name)),
        };
        tracing::trace!(pid = %pid, name = %name, "spawned process");
        self.nodes.insert(
            pid,
            ProcessNode {
                id: pid,
                name,
                period: spec.period.max(1),
                use_once: spec.use_once,
                counter: Some(0),
                result: ProcessResult::Ok,
                action: spec.action,
                on_done: spec.on_done,
                parent,
                children: Vec::new(),
            },
        );
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.push(pid);
            }
        }
        self.pending.push(pid);
        pid
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// End the process so its action no longer runs.
    ///
    /// Idempotent no-op on an already inactive process. If children remain,
    /// the completion callback and the parent notification are deferred
    /// until the last child finishes.
    pub fn done(&mut self, pid: Pid) {
        let Some(node) = self.nodes.get_mut(&pid) else {
            return;
        };
        if !node.is_active() {
            return;
        }
        node.counter = None;
        if node.children.is_empty() {
            self.finish(pid, true);
        }
    }

    /// Mark the process failed, then end it as [`Self::done`] does.
    ///
    /// Takes effect only once, while the process is alive with result ok.
    pub fn fail(&mut self, pid: Pid) {
        let Some(node) = self.nodes.get_mut(&pid) else {
            return;
        };
        if node.is_alive() && node.result == ProcessResult::Ok {
            node.result = ProcessResult::Failed;
            self.done(pid);
        }
    }

    /// Kill the process and its whole subtree, synchronously.
    ///
    /// Children are force-finished first, each running its completion
    /// callback with result killed but without notifying its own parent;
    /// only the process this was invoked on notifies upward, exactly once.
    /// By the time this returns, every completion callback in the subtree
    /// has fired. Unknown ids are a silent no-op.
    pub fn kill(&mut self, pid: Pid) {
        let Some(node) = self.nodes.get(&pid) else {
            return;
        };
        if !node.is_alive() {
            return;
        }
        let parent = node.parent;
        self.kill_no_notify(pid);
        if let Some(parent) = parent {
            self.notify_child_done(parent, pid);
        }
    }

    /// Kill every process, active and pending.
    ///
    /// The target set is snapshot first: processes spawned by completion
    /// callbacks during the pass survive it.
    pub fn kill_all(&mut self) {
        let targets: Vec<Pid> = self
            .active
            .iter()
            .chain(self.pending.iter())
            .copied()
            .collect();
        for pid in targets {
            self.kill(pid);
        }
    }

    /// Kill all children of a process without killing the process itself.
    ///
    /// If the process was already inactive and only waiting on those
    /// children, its own completion fires once they are gone.
    pub fn kill_children(&mut self, pid: Pid) {
        let Some(node) = self.nodes.get_mut(&pid) else {
            return;
        };
        let was_active = node.is_active();
        let children = mem::take(&mut node.children);
        let had_children = !children.is_empty();
        for child in children {
            self.kill_no_notify(child);
        }
        if had_children && !was_active {
            self.finish(pid, true);
        }
    }

    /// Kill every process with the given name, active and pending.
    /// An unmatched name is a silent no-op.
    pub fn kill_all_named(&mut self, name: &str) {
        let targets: Vec<Pid> = self
            .active
            .iter()
            .chain(self.pending.iter())
            .copied()
            .filter(|pid| self.nodes.get(pid).is_some_and(|n| n.name == name))
            .collect();
        for pid in targets {
            self.kill(pid);
        }
    }

    /// Set the tick counter, shifting when the action next runs.
    ///
    /// Clamped into `[0, period - 1]`; no-op on an inactive process.
    pub fn reset_counter(&mut self, pid: Pid, counter: u32) {
        if let Some(node) = self.nodes.get_mut(&pid) {
            if node.is_active() {
                node.counter = Some(counter.min(node.period - 1));
            }
        }
    }

    /// Change the tick interval between invocations, clamped to at least 1.
    pub fn set_period(&mut self, pid: Pid, period: u32) {
        if let Some(node) = self.nodes.get_mut(&pid) {
            node.period = period.max(1);
        }
    }

    // ------------------------------------------------------------------
    // Tick loop
    // ------------------------------------------------------------------

    /// Advance the scheduler by one simulation step: admit staged
    /// processes, run every due action, prune finished processes.
    ///
    /// An error returned by any action is recovered here, reported through
    /// the log sink, and never aborts the pass for sibling processes.
    pub fn tick(&mut self) {
        self.admit_pending();
        let pass: Vec<Pid> = self.active.clone();
        for pid in pass {
            self.tick_one(pid);
        }
        let before = self.active.len();
        let nodes = &self.nodes;
        self.active
            .retain(|pid| nodes.get(pid).is_some_and(ProcessNode::is_alive));
        let pruned = before - self.active.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned finished processes");
        }
    }

    fn admit_pending(&mut self) {
        let staged = mem::take(&mut self.pending);
        let mut admitted = 0_usize;
        for pid in staged {
            let Some(node) = self.nodes.get(&pid) else {
                // Killed while pending.
                continue;
            };
            if !node.is_alive() {
                continue;
            }
            if self.smart_phase && node.period > 1 && !node.use_once {
                self.assign_phase(pid);
            }
            self.active.push(pid);
            admitted += 1;
        }
        if admitted > 0 {
            tracing::debug!(admitted, "admitted staged processes");
        }
    }

    /// First-fit phase assignment: give the process the smallest counter in
    /// `[0, period)` not already used by an admitted process of the same
    /// period, or 0 when the whole window is occupied.
    fn assign_phase(&mut self, pid: Pid) {
        let Some(period) = self.nodes.get(&pid).map(|n| n.period) else {
            return;
        };
        let used: HashSet<u32> = self
            .active
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|n| n.period == period)
            .filter_map(|n| n.counter)
            .collect();
        let slot = (0..period).find(|c| !used.contains(c)).unwrap_or(0);
        self.reset_counter(pid, slot);
    }

    fn tick_one(&mut self, pid: Pid) {
        let (due, use_once) = match self.nodes.get_mut(&pid) {
            Some(node) => match node.counter {
                Some(counter) => {
                    let counter = counter + 1;
                    node.counter = Some(counter);
                    (counter >= node.period, node.use_once)
                }
                None => return,
            },
            None => return,
        };
        if !due {
            return;
        }
        if let Some(mut action) = self.nodes.get_mut(&pid).and_then(|n| n.action.take()) {
            let result = action(&mut ProcessCtx { sched: self, pid });
            if let Err(e) = result {
                let name = self.display_name(pid);
                self.report(format!("failed while running {name}: {e:#}"));
            }
            // The node is gone if the action finished its own process.
            if let Some(node) = self.nodes.get_mut(&pid) {
                node.action = Some(action);
            }
        }
        if let Some(node) = self.nodes.get_mut(&pid) {
            if node.is_active() {
                node.counter = Some(0);
            }
        }
        if use_once {
            self.done(pid);
        }
    }

    // ------------------------------------------------------------------
    // Completion plumbing
    // ------------------------------------------------------------------

    /// Tear down a subtree bottom-up without notifying above it. Children
    /// run their completion callbacks first; none of them notifies its own
    /// parent, since the whole branch is going away anyway.
    fn kill_no_notify(&mut self, pid: Pid) {
        let Some(node) = self.nodes.get_mut(&pid) else {
            return;
        };
        let was_alive = node.is_alive();
        node.counter = None;
        if was_alive {
            node.result = ProcessResult::Killed;
        }
        let children = mem::take(&mut node.children);
        for child in children {
            self.kill_no_notify(child);
        }
        if was_alive {
            self.finish(pid, false);
        }
    }

    /// Run the completion callback and, when requested, notify the parent.
    /// The node is removed from the arena first, so a callback that turns
    /// around and kills its own process hits a plain no-op.
    fn finish(&mut self, pid: Pid, notify: bool) {
        let Some(node) = self.nodes.remove(&pid) else {
            return;
        };
        let ProcessNode {
            name,
            result,
            on_done,
            parent,
            ..
        } = node;
        let completion = Completion { pid, name, result };
        if let Some(on_done) = on_done {
            // A completion callback error must not break the notify chain:
            // a stuck chain leaks the whole branch as alive forever.
            if let Err(e) = on_done(self, &completion) {
                self.report(format!(
                    "failed while terminating {}: {e:#}",
                    completion.name
                ));
            }
        }
        if notify {
            if let Some(parent) = parent {
                self.notify_child_done(parent, pid);
            }
        }
    }

    /// A finished child removes itself from its parent. If that leaves an
    /// inactive parent childless, the parent's own completion fires,
    /// recursing upward; this is how "wait for all children" propagates
    /// without actions tracking child counts themselves.
    fn notify_child_done(&mut self, parent: Pid, child: Pid) {
        let Some(node) = self.nodes.get_mut(&parent) else {
            return;
        };
        node.children.retain(|c| *c != child);
        if !node.is_active() && node.children.is_empty() {
            self.finish(parent, true);
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Whether the process is still ticked.
    #[must_use]
    pub fn is_active(&self, pid: Pid) -> bool {
        self.nodes.get(&pid).is_some_and(ProcessNode::is_active)
    }

    /// Whether the process is active or still waiting on children.
    #[must_use]
    pub fn is_alive(&self, pid: Pid) -> bool {
        self.nodes.get(&pid).is_some_and(ProcessNode::is_alive)
    }

    /// Ticks elapsed since the last invocation; `None` when inactive or
    /// finished.
    #[must_use]
    pub fn counter(&self, pid: Pid) -> Option<u32> {
        self.nodes.get(&pid).and_then(|n| n.counter)
    }

    /// Tick interval of a live process.
    #[must_use]
    pub fn period(&self, pid: Pid) -> Option<u32> {
        self.nodes.get(&pid).map(|n| n.period)
    }

    /// Name of a live process.
    #[must_use]
    pub fn name(&self, pid: Pid) -> Option<&str> {
        self.nodes.get(&pid).map(|n| n.name.as_str())
    }

    /// Current result of a live process. Finished processes report their
    /// result through the completion callback instead.
    #[must_use]
    pub fn result(&self, pid: Pid) -> Option<ProcessResult> {
        self.nodes.get(&pid).map(|n| n.result)
    }

    /// Number of alive processes, counting both active and pending.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_alive()).count()
    }

    /// Render every alive root subtree for operator diagnostics, one line
    /// per process: `"{id}: {name}"`, indented two spaces per tree depth.
    pub fn dump(&self, mut log: impl FnMut(&str)) {
        for pid in self.active.iter().chain(self.pending.iter()) {
            if let Some(node) = self.nodes.get(pid) {
                if node.is_alive() && node.parent.is_none() {
                    self.dump_subtree(*pid, 0, &mut log);
                }
            }
        }
    }

    fn dump_subtree(&self, pid: Pid, depth: usize, log: &mut impl FnMut(&str)) {
        let Some(node) = self.nodes.get(&pid) else {
            return;
        };
        log(&format!("{}{}: {}", "  ".repeat(depth), node.id, node.name));
        for child in &node.children {
            self.dump_subtree(*child, depth + 1, log);
        }
    }

    // ------------------------------------------------------------------
    // Persistence fan-out
    // ------------------------------------------------------------------

    /// Register a callback to run against the save sink on every
    /// [`Self::save`]. Hooks run in registration order.
    pub fn add_save_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut SaveSink) -> AppResult<()> + 'static,
    {
        self.save_hooks.push(Box::new(hook));
    }

    /// Run all save hooks against a fresh sink and hand the serialized
    /// result to `on_save`. The scheduler does not interpret the contents.
    pub fn save(&mut self, on_save: impl FnOnce(&str)) {
        self.save_with(SaveSink::new(), on_save);
    }

    /// Like [`Self::save`], starting from a caller-provided sink.
    ///
    /// A hook error is reported through the log sink and does not stop the
    /// remaining hooks.
    pub fn save_with(&mut self, mut sink: SaveSink, on_save: impl FnOnce(&str)) {
        let mut hooks = mem::take(&mut self.save_hooks);
        for hook in &mut hooks {
            if let Err(e) = hook(&mut sink) {
                self.report(format!("failed while saving: {e:#}"));
            }
        }
        self.save_hooks = hooks;
        match sink.render() {
            Ok(out) => on_save(&out),
            Err(e) => self.report(format!("failed while saving: {e}")),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn display_name(&self, pid: Pid) -> String {
        self.nodes
            .get(&pid)
            .map_or_else(|| format!("#{pid}"), |n| n.name.clone())
    }

    fn report(&mut self, line: String) {
        if let Some(sink) = self.log_sink.as_mut() {
            sink.record(line);
        }
    }
}

/// View of one process handed to its own action.
///
/// Exposes the process's identity and lifecycle controls, plus spawning, so
/// domain code stays agnostic to its depth in the tree.
pub struct ProcessCtx<'a> {
    sched: &'a mut Scheduler,
    pid: Pid,
}

impl ProcessCtx<'_> {
    /// Id of the running process.
    #[must_use]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Name of the running process.
    #[must_use]
    pub fn name(&self) -> &str {
        self.sched.name(self.pid).unwrap_or("<gone>")
    }

    /// Current counter. `None` once the process finished itself.
    #[must_use]
    pub fn counter(&self) -> Option<u32> {
        self.sched.counter(self.pid)
    }

    /// Current period.
    #[must_use]
    pub fn period(&self) -> Option<u32> {
        self.sched.period(self.pid)
    }

    /// Spawn a child of the running process.
    pub fn spawn(&mut self, spec: ProcessSpec) -> Result<Pid, SchedulerError> {
        self.sched.spawn_child(self.pid, spec)
    }

    /// Spawn a new root process on the scheduler.
    pub fn spawn_root(&mut self, spec: ProcessSpec) -> Pid {
        self.sched.spawn(spec)
    }

    /// End the running process; see [`Scheduler::done`].
    pub fn done(&mut self) {
        self.sched.done(self.pid);
    }

    /// Fail the running process; see [`Scheduler::fail`].
    pub fn fail(&mut self) {
        self.sched.fail(self.pid);
    }

    /// Kill the running process and its subtree; see [`Scheduler::kill`].
    pub fn kill(&mut self) {
        self.sched.kill(self.pid);
    }

    /// Kill all children of the running process, keeping it alive.
    pub fn kill_children(&mut self) {
        self.sched.kill_children(self.pid);
    }

    /// Kill another process by id.
    pub fn kill_process(&mut self, pid: Pid) {
        self.sched.kill(pid);
    }

    /// Kill every process with the given name.
    pub fn kill_all_named(&mut self, name: &str) {
        self.sched.kill_all_named(name);
    }

    /// Shift when the running process next fires; see
    /// [`Scheduler::reset_counter`].
    pub fn reset_counter(&mut self, counter: u32) {
        self.sched.reset_counter(self.pid, counter);
    }

    /// Change the running process's period.
    pub fn set_period(&mut self, period: u32) {
        self.sched.set_period(self.pid, period);
    }
}
