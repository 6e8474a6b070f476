// src/dag/plan.rs

//! Turning caller requests into an execution plan.

use tracing::debug;

use crate::dag::graph::{GraphError, TargetGraph};
use crate::targets::TargetDescriptor;
use crate::types::Args;

/// One requested target together with the argument values the caller gave it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCall {
    pub name: String,
    pub args: Args,
}

impl TargetCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Args::new(),
        }
    }

    pub fn with_arg(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(param.into(), value.into());
        self
    }
}

/// A planned target and the explicit arguments it will be invoked with.
#[derive(Debug, Clone)]
pub struct PlannedTarget<'g> {
    pub descriptor: &'g TargetDescriptor,
    pub args: Args,
}

/// Ordered list of targets to run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan<'g> {
    steps: Vec<PlannedTarget<'g>>,
}

impl<'g> ExecutionPlan<'g> {
    pub fn steps(&self) -> &[PlannedTarget<'g>] {
        &self.steps
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.descriptor.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resolve the calls against the graph and check their arguments.
///
/// Arguments only reach the targets the caller named; if a target is named
/// more than once, the first call's arguments are used. Every planned target
/// must end up with a value or a default for each of its parameters.
pub fn plan<'g>(
    graph: &'g TargetGraph,
    calls: &[TargetCall],
    default_target: Option<&str>,
) -> Result<ExecutionPlan<'g>, GraphError> {
    let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
    let order = graph.execution_order(&names, default_target)?;

    for call in calls {
        let Some(descriptor) = graph.get(&call.name) else {
            continue;
        };
        for param in call.args.keys() {
            if descriptor.parameter(param).is_none() {
                return Err(GraphError::UnknownParameter {
                    target: call.name.clone(),
                    param: param.clone(),
                });
            }
        }
    }

    let mut steps = Vec::with_capacity(order.len());
    for descriptor in order {
        let args = calls
            .iter()
            .find(|c| c.name == descriptor.name())
            .map(|c| c.args.clone())
            .unwrap_or_default();

        if let Some(missing) = descriptor
            .parameters()
            .iter()
            .find(|p| !p.is_optional() && !args.contains_key(p.name()))
        {
            return Err(GraphError::MissingArgument {
                target: descriptor.name().to_string(),
                param: missing.name().to_string(),
            });
        }

        steps.push(PlannedTarget { descriptor, args });
    }

    let plan = ExecutionPlan { steps };
    debug!(order = ?plan.target_names(), "planned execution order");
    Ok(plan)
}
