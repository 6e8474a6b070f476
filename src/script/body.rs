// src/script/body.rs

use tracing::debug;

use crate::engine::BuildContext;
use crate::errors::TargetError;
use crate::program::{BoxFuture, TargetBody};
use crate::script::interpolate::interpolate;
use crate::types::Args;

/// A resolved `Symbol.task` invocation with raw (uninterpolated) arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub task: String,
    pub args: Args,
}

/// Body of a script member: its steps, run in order.
///
/// Task references are resolved through the context's namespaces when the
/// step runs, so a library is only loaded if one of its tasks is used.
#[derive(Debug, Clone)]
pub struct ScriptBody {
    member: String,
    steps: Vec<Step>,
}

impl ScriptBody {
    pub fn new(member: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            member: member.into(),
            steps,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl TargetBody for ScriptBody {
    fn invoke<'a>(
        &'a self,
        ctx: &'a mut BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>> {
        Box::pin(async move {
            for step in &self.steps {
                let resolved: Args = step
                    .args
                    .iter()
                    .map(|(key, raw)| {
                        let value = interpolate(raw, |name| {
                            args.get(name)
                                .cloned()
                                .or_else(|| ctx.property(name).map(str::to_string))
                        });
                        (key.clone(), value)
                    })
                    .collect();

                debug!(member = %self.member, task = %step.task, args = ?resolved, "running step");
                let primitive = ctx.namespaces().resolve_task(&step.task)?;
                primitive.run(ctx, &resolved).await?;
            }
            Ok(())
        })
    }
}
