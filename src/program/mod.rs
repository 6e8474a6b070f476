// src/program/mod.rs

//! In-memory model of a compiled build program.
//!
//! A [`Program`] is what a script front-end hands to the core: an ordered list
//! of callable [`Member`]s, each with its documentation, parameters, optional
//! target marker and an invocable [`TargetBody`]. The core never looks inside
//! a body; it only reflects over the member metadata and calls the body at
//! execution time.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::engine::BuildContext;
use crate::errors::TargetError;
use crate::types::{Args, Owner, Visibility};

/// Boxed, sendable future used by the invocation traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Code behind a program member.
///
/// Bodies get the shared build context mutably and the already resolved
/// argument values (explicit values or evaluated defaults) keyed by
/// parameter name.
pub trait TargetBody: Send + Sync {
    fn invoke<'a>(
        &'a self,
        ctx: &'a mut BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>>;
}

/// Adapter turning a synchronous closure into a [`TargetBody`].
pub struct FnBody<F>(pub F);

impl<F> TargetBody for FnBody<F>
where
    F: Fn(&mut BuildContext, &Args) -> Result<(), TargetError> + Send + Sync,
{
    fn invoke<'a>(
        &'a self,
        ctx: &'a mut BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>> {
        Box::pin(async move { (self.0)(ctx, args) })
    }
}

/// Convenience for wrapping a closure as a shared body.
pub fn body_fn<F>(f: F) -> Arc<dyn TargetBody>
where
    F: Fn(&mut BuildContext, &Args) -> Result<(), TargetError> + Send + Sync + 'static,
{
    Arc::new(FnBody(f))
}

/// Deferred default-value expression for an optional parameter.
///
/// The source text is kept for help output; the thunk is only run when the
/// target is invoked without an explicit value, because defaults may read
/// state produced earlier in the build.
#[derive(Clone)]
pub struct DefaultExpr {
    source: String,
    thunk: Arc<dyn Fn(&BuildContext) -> String + Send + Sync>,
}

impl DefaultExpr {
    pub fn new<F>(source: impl Into<String>, thunk: F) -> Self
    where
        F: Fn(&BuildContext) -> String + Send + Sync + 'static,
    {
        Self {
            source: source.into(),
            thunk: Arc::new(thunk),
        }
    }

    /// A default that always evaluates to its own source text.
    pub fn literal(value: impl Into<String>) -> Self {
        let value = value.into();
        let result = value.clone();
        Self::new(value, move |_| result.clone())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn evaluate(&self, ctx: &BuildContext) -> String {
        (self.thunk)(ctx)
    }
}

impl fmt::Debug for DefaultExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefaultExpr").field(&self.source).finish()
    }
}

impl PartialEq for DefaultExpr {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A formal parameter of a member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberParam {
    pub name: String,
    pub doc: Option<String>,
    /// Present iff the parameter is optional.
    pub default: Option<DefaultExpr>,
}

impl MemberParam {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: DefaultExpr) -> Self {
        Self {
            name: name.into(),
            doc: None,
            default: Some(default),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Explicit target marker, with the member names (display or hyphen form)
/// of the targets it depends on, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetMarker {
    pub depends: Vec<String>,
}

/// A public or private callable member of a program.
#[derive(Clone)]
pub struct Member {
    /// Name as written in the script, usually camelCase (`buildJar`).
    pub display_name: String,
    pub visibility: Visibility,
    pub owner: Owner,
    pub doc: Option<String>,
    pub marker: Option<TargetMarker>,
    pub params: Vec<MemberParam>,
    pub body: Arc<dyn TargetBody>,
}

impl Member {
    pub fn new(display_name: impl Into<String>, body: Arc<dyn TargetBody>) -> Self {
        Self {
            display_name: display_name.into(),
            visibility: Visibility::Public,
            owner: Owner::Program,
            doc: None,
            marker: None,
            params: Vec::new(),
            body,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("display_name", &self.display_name)
            .field("visibility", &self.visibility)
            .field("owner", &self.owner)
            .field("doc", &self.doc)
            .field("marker", &self.marker)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A compiled build program.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub name: String,
    /// Target to run when the caller requests none.
    pub default_target: Option<String>,
    members: Vec<Member>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_target: None,
            members: Vec::new(),
        }
    }

    pub fn with_default_target(mut self, target: impl Into<String>) -> Self {
        self.default_target = Some(target.into());
        self
    }

    pub fn push_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}
