// src/engine/mod.rs

//! Build execution.
//!
//! - [`context`] holds the mutable state shared by every target of a run:
//!   properties, listeners, library namespaces and filesystem.
//! - [`listener`] defines the lifecycle notifications and the default
//!   logging listener.
//! - [`core`] contains the [`ExecutionEngine`] state machine that builds the
//!   target graph, runs the planned targets in order and reports the outcome.
//! - [`outcome`] is the result handed back to the caller.

pub mod context;
pub mod core;
pub mod listener;
pub mod outcome;

pub use context::BuildContext;
pub use core::{EngineState, ExecutionEngine};
pub use listener::{BuildEvent, BuildListener, ListenerBus, LoggingListener};
pub use outcome::{BuildError, BuildOutcome};
