// src/library/namespace.rs

use std::fmt;
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::{debug, info};

use crate::library::catalog::{TaskCatalog, TaskLibrary, TaskPrimitive};
use crate::library::registry::LibraryRegistry;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("task reference '{0}' is not of the form Symbol.task")]
    BadReference(String),

    #[error("unknown library symbol '{0}'")]
    UnknownNamespace(String),

    #[error("library '{symbol}' points at unknown resource '{resource}'")]
    ResourceNotFound { symbol: String, resource: String },

    #[error("library '{symbol}' has no task named '{task}'")]
    UnknownTask { symbol: String, task: String },
}

/// Split `Symbol.task` at the first dot.
pub fn split_reference(reference: &str) -> Result<(&str, &str), LibraryError> {
    match reference.split_once('.') {
        Some((symbol, task)) if !symbol.is_empty() && !task.is_empty() => Ok((symbol, task)),
        _ => Err(LibraryError::BadReference(reference.to_string())),
    }
}

/// A registry entry whose library is loaded on first use.
pub struct LazyNamespace {
    symbol: String,
    resource: String,
    library: OnceLock<Option<Arc<dyn TaskLibrary>>>,
}

impl LazyNamespace {
    fn new(symbol: &str, resource: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            resource: resource.to_string(),
            library: OnceLock::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn is_loaded(&self) -> bool {
        self.library.get().is_some()
    }

    fn library(&self, catalog: &TaskCatalog) -> Result<Arc<dyn TaskLibrary>, LibraryError> {
        let loaded = self.library.get_or_init(|| {
            info!(symbol = %self.symbol, resource = %self.resource, "loading task library");
            catalog.load(&self.resource)
        });
        loaded.clone().ok_or_else(|| LibraryError::ResourceNotFound {
            symbol: self.symbol.clone(),
            resource: self.resource.clone(),
        })
    }
}

impl fmt::Debug for LazyNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyNamespace")
            .field("symbol", &self.symbol)
            .field("resource", &self.resource)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Namespace providers for every registry entry.
///
/// Built once before the program runs and only read afterwards; the lazy
/// loading cells are the only interior mutability.
#[derive(Debug)]
pub struct LibraryNamespaces {
    namespaces: Vec<LazyNamespace>,
    catalog: Arc<TaskCatalog>,
}

impl LibraryNamespaces {
    /// Register one lazy namespace per registry entry, in registry order.
    pub fn register(registry: &LibraryRegistry, catalog: Arc<TaskCatalog>) -> Self {
        let namespaces = registry
            .entries()
            .iter()
            .map(|entry| {
                debug!(symbol = %entry.symbol, resource = %entry.resource, "registering namespace");
                LazyNamespace::new(&entry.symbol, &entry.resource)
            })
            .collect();
        Self {
            namespaces,
            catalog,
        }
    }

    pub fn namespace(&self, symbol: &str) -> Option<&LazyNamespace> {
        self.namespaces.iter().find(|ns| ns.symbol == symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.namespaces.iter().map(|ns| ns.symbol.as_str())
    }

    pub fn is_loaded(&self, symbol: &str) -> bool {
        self.namespace(symbol).is_some_and(LazyNamespace::is_loaded)
    }

    /// Resolve a `Symbol.task` reference, loading the library if needed.
    pub fn resolve_task(&self, reference: &str) -> Result<Arc<dyn TaskPrimitive>, LibraryError> {
        let (symbol, task) = split_reference(reference)?;
        let namespace = self
            .namespace(symbol)
            .ok_or_else(|| LibraryError::UnknownNamespace(symbol.to_string()))?;
        let library = namespace.library(&self.catalog)?;
        library.task(task).ok_or_else(|| LibraryError::UnknownTask {
            symbol: symbol.to_string(),
            task: task.to_string(),
        })
    }
}
