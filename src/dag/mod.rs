// src/dag/mod.rs

//! Target dependency graph and execution planning.
//!
//! - [`graph`] builds and validates the graph and computes execution order.
//! - [`plan`] pairs that order with the caller's per-target arguments.

pub mod graph;
pub mod plan;

pub use graph::{GraphError, TargetGraph};
pub use plan::{plan, ExecutionPlan, PlannedTarget, TargetCall};
