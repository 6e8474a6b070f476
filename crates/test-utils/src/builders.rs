#![allow(dead_code)]

use std::sync::Arc;

use scriptdag::program::{body_fn, DefaultExpr, Member, MemberParam, Program, TargetBody, TargetMarker};
use scriptdag::targets::{ParamDescriptor, TargetDescriptor};
use scriptdag::types::{Owner, Visibility};

/// Builder for `Program` to simplify test setup.
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            program: Program::new(name),
        }
    }

    pub fn default_target(mut self, target: &str) -> Self {
        self.program.default_target = Some(target.to_string());
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.program.push_member(member);
        self
    }

    pub fn build(self) -> Program {
        self.program
    }
}

/// Builder for `Member`. Members start public, owned by the program, with a
/// body that does nothing.
pub struct MemberBuilder {
    member: Member,
}

impl MemberBuilder {
    pub fn new(display_name: &str) -> Self {
        Self {
            member: Member::new(display_name, noop_body()),
        }
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.member.doc = Some(doc.to_string());
        self
    }

    /// Attach an explicit target marker without dependencies.
    pub fn target(mut self) -> Self {
        self.member.marker.get_or_insert_with(TargetMarker::default);
        self
    }

    /// Attach a target marker with the given dependencies.
    pub fn depends(mut self, deps: &[&str]) -> Self {
        let marker = self.member.marker.get_or_insert_with(TargetMarker::default);
        marker.depends.extend(deps.iter().map(|d| d.to_string()));
        self
    }

    pub fn private(mut self) -> Self {
        self.member.visibility = Visibility::Private;
        self
    }

    pub fn from_library(mut self, symbol: &str) -> Self {
        self.member.owner = Owner::Library(symbol.to_string());
        self
    }

    pub fn required_param(mut self, name: &str) -> Self {
        self.member.params.push(MemberParam::required(name));
        self
    }

    pub fn optional_param(mut self, name: &str, default: DefaultExpr) -> Self {
        self.member.params.push(MemberParam::optional(name, default));
        self
    }

    pub fn param(mut self, param: MemberParam) -> Self {
        self.member.params.push(param);
        self
    }

    pub fn body(mut self, body: Arc<dyn TargetBody>) -> Self {
        self.member.body = body;
        self
    }

    pub fn build(self) -> Member {
        self.member
    }
}

pub fn noop_body() -> Arc<dyn TargetBody> {
    body_fn(|_, _| Ok(()))
}

/// Descriptor with a no-op body, for graph tests.
pub fn descriptor(name: &str, deps: &[&str]) -> TargetDescriptor {
    TargetDescriptor::new(name, noop_body()).with_dependencies(deps.iter().copied())
}

/// Descriptor with a required parameter.
pub fn descriptor_with_param(name: &str, deps: &[&str], param: &str) -> TargetDescriptor {
    descriptor(name, deps).with_parameters(vec![ParamDescriptor::new(param, None, None)])
}
