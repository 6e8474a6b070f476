// src/library/mod.rs

//! Task-library resolution.
//!
//! - [`registry`] maps library symbols to resource locators, seeded with the
//!   built-in libraries and extended by `#antlib` directives in the script.
//! - [`catalog`] holds the task libraries the engine knows how to load, keyed
//!   by resource locator.
//! - [`namespace`] turns a registry into lazily loaded namespaces so that
//!   `Symbol.task` references resolve on first use.

pub mod catalog;
pub mod namespace;
pub mod registry;

pub use catalog::{StaticLibrary, TaskCatalog, TaskLibrary, TaskPrimitive};
pub use namespace::{LazyNamespace, LibraryError, LibraryNamespaces};
pub use registry::{LibraryEntry, LibraryRegistry, ScanDiagnostic};
