// src/engine/core.rs

//! The execution engine.
//!
//! One engine drives one build: `NotStarted -> Running -> {Succeeded, Failed}`.
//! The graph is built and planned inside the run so that graph errors are
//! reported through the same lifecycle as target failures, and the
//! "build finished" notification fires exactly once on every exit path.

use tracing::{debug, info, warn};

use crate::dag::{plan, TargetCall, TargetGraph};
use crate::engine::context::BuildContext;
use crate::engine::listener::BuildEvent;
use crate::engine::outcome::{BuildError, BuildOutcome};
use crate::errors::TargetError;
use crate::targets::TargetDescriptor;
use crate::types::{Args, TargetName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub struct ExecutionEngine {
    descriptors: Vec<TargetDescriptor>,
    default_target: Option<String>,
    state: EngineState,
}

impl ExecutionEngine {
    pub fn new(descriptors: Vec<TargetDescriptor>, default_target: Option<String>) -> Self {
        Self {
            descriptors,
            default_target,
            state: EngineState::NotStarted,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run the requested targets (or the default target) once.
    ///
    /// Targets run strictly one after another. The first failure stops the
    /// build; targets that already completed keep their effects. An
    /// abrupt-termination signal with status 0 stops the build successfully.
    pub async fn run(&mut self, ctx: &mut BuildContext, calls: &[TargetCall]) -> BuildOutcome {
        if self.state != EngineState::NotStarted {
            warn!(state = ?self.state, "engine is not restartable; ignoring run request");
            return BuildOutcome::new(Vec::new(), Some(BuildError::AlreadyStarted));
        }

        self.state = EngineState::Running;
        ctx.fire(&BuildEvent::BuildStarted);

        let mut executed = Vec::new();
        let error = self.execute(ctx, calls, &mut executed).await.err();

        ctx.fire(&BuildEvent::BuildFinished {
            error: error.as_ref(),
        });

        self.state = if error.is_none() {
            EngineState::Succeeded
        } else {
            EngineState::Failed
        };
        info!(state = ?self.state, executed = executed.len(), "build finished");

        BuildOutcome::new(executed, error)
    }

    async fn execute(
        &self,
        ctx: &mut BuildContext,
        calls: &[TargetCall],
        executed: &mut Vec<TargetName>,
    ) -> Result<(), BuildError> {
        let graph = TargetGraph::build(self.descriptors.clone())?;
        let plan = plan(&graph, calls, self.default_target.as_deref())?;
        info!(order = ?plan.target_names(), "executing targets");

        for step in plan.steps() {
            let descriptor = step.descriptor;
            let name = descriptor.name();

            ctx.fire(&BuildEvent::TargetStarted { target: name });
            let args = resolve_arguments(descriptor, &step.args, ctx);
            let result = descriptor.body().invoke(ctx, &args).await;
            ctx.fire(&BuildEvent::TargetFinished {
                target: name,
                error: result.as_ref().err(),
            });
            executed.push(name.to_string());

            match result {
                Ok(()) => {}
                Err(TargetError::Exit(0)) => {
                    info!(target_name = %name, "target requested exit with status 0; stopping build");
                    return Ok(());
                }
                Err(TargetError::Exit(status)) => {
                    return Err(BuildError::Exit {
                        target: name.to_string(),
                        status,
                    });
                }
                Err(TargetError::Failed(cause)) => {
                    return Err(BuildError::TargetFailed {
                        target: name.to_string(),
                        cause,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Explicit values first; defaults are evaluated now, against the current
/// state of the build.
fn resolve_arguments(descriptor: &TargetDescriptor, supplied: &Args, ctx: &BuildContext) -> Args {
    let mut args = Args::new();
    for param in descriptor.parameters() {
        if let Some(value) = supplied.get(param.name()) {
            args.insert(param.name().to_string(), value.clone());
        } else if let Some(default) = param.default() {
            let value = default.evaluate(ctx);
            debug!(
                target_name = %descriptor.name(),
                param = %param.name(),
                default = %default.source(),
                value = %value,
                "evaluated default parameter"
            );
            args.insert(param.name().to_string(), value);
        }
    }
    args
}
