// src/targets/descriptor.rs

use std::fmt;
use std::sync::Arc;

use crate::program::{DefaultExpr, TargetBody};
use crate::types::{Owner, TargetName};

/// One parameter of a target.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    name: String,
    default: Option<DefaultExpr>,
    description: Option<String>,
}

impl ParamDescriptor {
    pub fn new(
        name: impl Into<String>,
        default: Option<DefaultExpr>,
        description: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default,
            description,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Unevaluated default; evaluated by the engine at invocation time.
    pub fn default(&self) -> Option<&DefaultExpr> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Immutable description of a single invocable target.
///
/// Built by consuming `with_*` calls; there is no way to change a descriptor
/// once it has been handed out.
#[derive(Clone)]
pub struct TargetDescriptor {
    name: TargetName,
    description: Option<String>,
    dependencies: Vec<TargetName>,
    parameters: Vec<ParamDescriptor>,
    owner: Owner,
    body: Arc<dyn TargetBody>,
}

impl TargetDescriptor {
    pub fn new(name: impl Into<TargetName>, body: Arc<dyn TargetBody>) -> Self {
        Self {
            name: name.into(),
            description: None,
            dependencies: Vec::new(),
            parameters: Vec::new(),
            owner: Owner::Program,
            body,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TargetName>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ParamDescriptor>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Documented targets are the ones shown in help listings.
    pub fn is_documented(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Dependencies in declaration order.
    pub fn dependencies(&self) -> &[TargetName] {
        &self.dependencies
    }

    pub fn parameters(&self) -> &[ParamDescriptor] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn body(&self) -> &Arc<dyn TargetBody> {
        &self.body
    }
}

impl PartialEq for TargetDescriptor {
    /// Bodies are opaque; two descriptors are equal when all metadata is.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.dependencies == other.dependencies
            && self.parameters == other.parameters
            && self.owner == other.owner
    }
}

impl fmt::Debug for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("parameters", &self.parameters)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
