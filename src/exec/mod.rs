// src/exec/mod.rs

//! Built-in task libraries.
//!
//! - [`core_tasks`] is the core library (`Core.*`): console output, shell
//!   commands, properties, files, failure and early exit.
//! - [`deps_tasks`] is the dependency-management library (`Deps.*`).
//! - [`process`] runs shell commands for `Core.exec`.

pub mod core_tasks;
pub mod deps_tasks;
pub mod process;

pub use core_tasks::core_library;
pub use deps_tasks::deps_library;

use anyhow::anyhow;

use crate::errors::TargetError;
use crate::types::Args;

/// Fetch a mandatory task argument.
pub(crate) fn required<'a>(args: &'a Args, task: &str, key: &str) -> Result<&'a str, TargetError> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| TargetError::Failed(anyhow!("task '{task}' requires argument '{key}'")))
}

/// Parse a boolean flag argument (`true`/`false`/`yes`/`no`/`on`/`off`).
pub(crate) fn flag(args: &Args, key: &str, default: bool) -> bool {
    match args.get(key).map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "true" | "yes" | "on" | "1") => true,
        Some(v) if matches!(v.as_str(), "false" | "no" | "off" | "0") => false,
        _ => default,
    }
}
