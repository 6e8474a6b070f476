// src/engine/context.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::engine::listener::{BuildEvent, BuildListener, ListenerBus};
use crate::fs::FileSystem;
use crate::library::LibraryNamespaces;

/// Mutable state shared by all targets of one build.
///
/// Owned by the caller and passed explicitly into the engine and every target
/// body; it is only ever touched from the single execution task.
pub struct BuildContext {
    base_dir: PathBuf,
    user_properties: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
    listeners: ListenerBus,
    namespaces: Arc<LibraryNamespaces>,
    fs: Arc<dyn FileSystem>,
}

impl BuildContext {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        namespaces: Arc<LibraryNamespaces>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            user_properties: BTreeMap::new(),
            properties: BTreeMap::new(),
            listeners: ListenerBus::default(),
            namespaces,
            fs,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a possibly relative path against the build's base directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Set a caller-supplied property. User properties cannot be overwritten
    /// by the build itself.
    pub fn set_user_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.user_properties.insert(name.into(), value.into());
    }

    /// Set a build property. Returns `false` when a user property of the same
    /// name shadows it, in which case nothing changes.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.user_properties.contains_key(&name) {
            debug!(property = %name, "user property takes precedence; ignoring override");
            return false;
        }
        self.properties.insert(name, value.into());
        true
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.user_properties
            .get(name)
            .or_else(|| self.properties.get(name))
            .map(String::as_str)
    }

    pub fn add_listener(&mut self, listener: Box<dyn BuildListener>) {
        self.listeners.add(listener);
    }

    pub(crate) fn fire(&mut self, event: &BuildEvent<'_>) {
        self.listeners.fire(event);
    }

    pub fn namespaces(&self) -> &LibraryNamespaces {
        &self.namespaces
    }

    pub fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("base_dir", &self.base_dir)
            .field("user_properties", &self.user_properties)
            .field("properties", &self.properties)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
