// src/library/catalog.rs

//! Task libraries known to the engine, keyed by resource locator.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::engine::BuildContext;
use crate::errors::TargetError;
use crate::exec;
use crate::library::registry::{CORE_RESOURCE, DEPS_RESOURCE};
use crate::program::BoxFuture;
use crate::types::Args;

/// A single side-effecting task a build script can invoke as `Symbol.task`.
pub trait TaskPrimitive: Send + Sync {
    fn run<'a>(
        &'a self,
        ctx: &'a mut BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>>;
}

/// A loaded task library.
pub trait TaskLibrary: Send + Sync {
    fn name(&self) -> &str;
    fn task(&self, name: &str) -> Option<Arc<dyn TaskPrimitive>>;
    fn task_names(&self) -> Vec<String>;
}

/// Task library backed by a fixed table of primitives.
#[derive(Clone)]
pub struct StaticLibrary {
    name: String,
    tasks: BTreeMap<String, Arc<dyn TaskPrimitive>>,
}

impl StaticLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: BTreeMap::new(),
        }
    }

    pub fn with_task(mut self, name: impl Into<String>, task: Arc<dyn TaskPrimitive>) -> Self {
        self.tasks.insert(name.into(), task);
        self
    }
}

impl fmt::Debug for StaticLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticLibrary")
            .field("name", &self.name)
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TaskLibrary for StaticLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn task(&self, name: &str) -> Option<Arc<dyn TaskPrimitive>> {
        self.tasks.get(name).cloned()
    }

    fn task_names(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }
}

type LibraryFactory = Arc<dyn Fn() -> Arc<dyn TaskLibrary> + Send + Sync>;

/// Resource locator -> library factory.
///
/// Factories run only when a namespace is first resolved, never when the
/// catalog is built.
#[derive(Clone, Default)]
pub struct TaskCatalog {
    factories: HashMap<String, LibraryFactory>,
}

impl TaskCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in core and dependency libraries.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(CORE_RESOURCE, || Arc::new(exec::core_library()));
        catalog.register(DEPS_RESOURCE, || Arc::new(exec::deps_library()));
        catalog
    }

    pub fn register<F>(&mut self, resource: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn TaskLibrary> + Send + Sync + 'static,
    {
        self.factories.insert(resource.into(), Arc::new(factory));
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.factories.contains_key(resource)
    }

    /// Construct the library behind `resource`, if the catalog knows it.
    pub fn load(&self, resource: &str) -> Option<Arc<dyn TaskLibrary>> {
        self.factories.get(resource).map(|factory| factory())
    }
}

impl fmt::Debug for TaskCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut resources: Vec<_> = self.factories.keys().collect();
        resources.sort();
        f.debug_struct("TaskCatalog")
            .field("resources", &resources)
            .finish()
    }
}
