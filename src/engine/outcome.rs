// src/engine/outcome.rs

use thiserror::Error;

use crate::dag::GraphError;
use crate::types::{EXIT_FAILURE, EXIT_SCRIPT_INVALID, EXIT_SUCCESS, TargetName};

/// Why a build did not succeed.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Graph construction or planning failed; no target ran.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("target '{target}' failed: {cause:#}")]
    TargetFailed {
        target: TargetName,
        cause: anyhow::Error,
    },

    /// A target raised the abrupt-termination signal with a non-zero status.
    #[error("target '{target}' exited with status {status}")]
    Exit { target: TargetName, status: i32 },

    #[error("this engine has already run a build")]
    AlreadyStarted,
}

/// Result of one engine run.
#[derive(Debug)]
pub struct BuildOutcome {
    executed: Vec<TargetName>,
    error: Option<BuildError>,
}

impl BuildOutcome {
    pub(crate) fn new(executed: Vec<TargetName>, error: Option<BuildError>) -> Self {
        Self { executed, error }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Targets whose bodies were invoked, in order. A failing target is
    /// included as the last entry.
    pub fn executed(&self) -> &[TargetName] {
        &self.executed
    }

    pub fn error(&self) -> Option<&BuildError> {
        self.error.as_ref()
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match &self.error {
            None => EXIT_SUCCESS,
            Some(BuildError::Graph(_)) => EXIT_SCRIPT_INVALID,
            Some(BuildError::Exit { status, .. }) => *status,
            Some(BuildError::TargetFailed { .. }) | Some(BuildError::AlreadyStarted) => {
                EXIT_FAILURE
            }
        }
    }
}
