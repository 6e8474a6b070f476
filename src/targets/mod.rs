// src/targets/mod.rs

//! Targets discovered on a program.
//!
//! - [`descriptor`] is the immutable record for one target.
//! - [`reflector`] turns a [`Program`](crate::program::Program) into
//!   descriptors.
//! - [`help`] derives the documented-target listing from descriptors.

pub mod descriptor;
pub mod help;
pub mod reflector;

pub use descriptor::{ParamDescriptor, TargetDescriptor};
pub use help::{HelpEntry, HelpParam};
pub use reflector::{camel_to_hyphen, is_target_member, reflect};
