// src/script/mod.rs

//! TOML build scripts.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Read a script and turn it into a [`Program`](crate::program::Program)
//!   (`loader.rs`).
//! - Verify member declarations against the library registry (`validate.rs`).
//! - Execute member steps at invocation time (`body.rs`), with `${name}`
//!   interpolation (`interpolate.rs`).
//!
//! ```toml
//! #antlib Tools vendor/tools
//! default = "package"
//!
//! [[member]]
//! name = "compile"
//! doc = "Compile sources"
//! depends = ["clean"]
//! steps = [{ cmd = "cargo build" }]
//! ```

pub mod body;
pub mod interpolate;
pub mod loader;
pub mod model;
pub mod validate;

pub use body::{ScriptBody, Step};
pub use loader::{load_program, parse_script, read_script};
pub use model::{RawMember, RawParam, RawScript, RawStep};
