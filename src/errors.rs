// src/errors.rs

//! Crate-wide error types.

use thiserror::Error;

use crate::dag::GraphError;
use crate::library::LibraryError;
use crate::types::{EXIT_FAILURE, EXIT_SCRIPT_INVALID, EXIT_SCRIPT_NOT_FOUND};

#[derive(Error, Debug)]
pub enum ScriptdagError {
    #[error("Build script not found: {path} ({reason})")]
    ScriptNotFound { path: String, reason: String },

    #[error("Build script parse error: {0}")]
    ScriptParse(#[from] toml::de::Error),

    #[error("Invalid build script: {0}")]
    ScriptInvalid(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScriptdagError {
    /// Process exit status the binary reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScriptdagError::ScriptNotFound { .. } | ScriptdagError::ScriptParse(_) => {
                EXIT_SCRIPT_NOT_FOUND
            }
            ScriptdagError::ScriptInvalid(_) | ScriptdagError::Graph(_) => EXIT_SCRIPT_INVALID,
            ScriptdagError::Other(_) => EXIT_FAILURE,
        }
    }
}

/// Error raised by a target body or a task primitive.
///
/// `Exit` is the abrupt-termination signal: it stops the build at the current
/// target boundary and carries the status the process should exit with.
/// A status of zero is a clean stop, not a failure.
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("exit requested with status {0}")]
    Exit(i32),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl From<LibraryError> for TargetError {
    fn from(err: LibraryError) -> Self {
        TargetError::Failed(anyhow::Error::from(err))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ScriptdagError>;
