//! # tickproc
//!
//! A hierarchical, cooperative process scheduler for tick-driven control
//! systems.
//!
//! Control software for vehicles and automation rigs is usually built as
//! many small behaviors (actuator loops, waypoint following, multi-stage
//! docking, solar tracking) all sharing one budget-constrained execution
//! tick. `tickproc` provides the substrate they run on: a scheduler of named,
//! possibly periodic processes that start, run, spawn child processes, and
//! terminate, with deterministic completion ordering and safe cancellation
//! of whole subtrees.
//!
//! ## Core Model
//!
//! - **Process**: a named unit of work with a tick period, an optional
//!   periodic action, an optional completion callback, and an owned set of
//!   child processes. Processes form a forest extended dynamically at
//!   runtime.
//! - **Scheduler**: owns every process, admits newly spawned ones each
//!   tick, runs due actions, and prunes finished subtrees. The host calls
//!   [`Scheduler::tick`](core::Scheduler::tick) once per simulation step.
//!
//! ## Key Properties
//!
//! - **Deterministic termination**: a process's completion callback fires
//!   exactly once, only after all of its children have finished.
//! - **Safe subtree cancellation**: killing a process synchronously
//!   force-finishes its whole subtree, children first, with a single
//!   notification reaching the parent.
//! - **Phase smoothing**: same-period processes are admitted on distinct
//!   counter offsets, so periodic load spreads across the period window
//!   instead of co-firing.
//! - **Fault isolation**: an error returned by one process's callbacks is
//!   recovered, reported through an injected log sink, and never disturbs
//!   sibling processes or the tick pass.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tickproc::core::{ProcessSpec, Scheduler};
//!
//! let mut sched = Scheduler::new();
//! let fired = Rc::new(RefCell::new(0));
//! let seen = Rc::clone(&fired);
//! sched.spawn(
//!     ProcessSpec::named("telemetry")
//!         .with_period(10)
//!         .with_action(move |_ctx| {
//!             *seen.borrow_mut() += 1;
//!             Ok(())
//!         }),
//! );
//! for _ in 0..30 {
//!     sched.tick();
//! }
//! assert_eq!(*fired.borrow(), 3);
//! ```
//!
//! Execution is strictly single-threaded and cooperative: no callback may
//! block, and "waiting" is expressed through periodic re-invocation rather
//! than suspension. Calling [`Scheduler::tick`](core::Scheduler::tick) from
//! inside a callback is not supported.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core process abstraction and the tick scheduler.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Builders to construct scheduler components from configuration.
pub mod builders;
/// Infrastructure adapters for persistence fan-out.
pub mod infra;
/// Shared utilities.
pub mod util;
