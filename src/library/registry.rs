// src/library/registry.rs

use tracing::{debug, error, warn};

/// Directive that declares a user task library inside a build script.
///
/// Syntax: `#antlib <symbol> <resource>`. Being a comment, the directive is
/// invisible to the script parser and only seen by [`LibraryRegistry::scan`].
pub const DIRECTIVE_TOKEN: &str = "#antlib";

/// Symbol and resource of the built-in core task library.
pub const CORE_SYMBOL: &str = "Core";
pub const CORE_RESOURCE: &str = "scriptdag/tasks/core";

/// Symbol and resource of the built-in dependency-management library.
pub const DEPS_SYMBOL: &str = "Deps";
pub const DEPS_RESOURCE: &str = "scriptdag/tasks/deps";

/// One `symbol -> resource` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub symbol: String,
    pub resource: String,
}

/// Something the directive scan reported. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDiagnostic {
    /// The directive did not have exactly two fields; the line was skipped.
    Malformed { line: usize, text: String },
    /// A symbol was declared again; the later declaration replaced `previous`.
    Overridden {
        line: usize,
        symbol: String,
        previous: String,
        resource: String,
    },
}

/// Ordered mapping from library symbol to resource locator.
///
/// Symbols are unique: declaring an existing symbol replaces its resource but
/// keeps the entry's original position, so diagnostics list libraries in a
/// stable order.
#[derive(Debug, Clone, Default)]
pub struct LibraryRegistry {
    entries: Vec<LibraryEntry>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl LibraryRegistry {
    /// An empty registry, without built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding only the built-in libraries.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.declare(CORE_SYMBOL, CORE_RESOURCE);
        registry.declare(DEPS_SYMBOL, DEPS_RESOURCE);
        registry
    }

    /// Built-ins first, then every directive found in `script`, in file order.
    pub fn from_script(script: &str) -> Self {
        let mut registry = Self::with_builtins();
        registry.scan(script);
        registry
    }

    /// Single forward pass over the script text applying each directive.
    ///
    /// Malformed directives are logged and skipped. Re-declared symbols are
    /// logged as warnings and the later declaration wins.
    pub fn scan(&mut self, script: &str) {
        for (idx, line) in script.lines().enumerate() {
            let line_no = idx + 1;
            let Some(pos) = line.find(DIRECTIVE_TOKEN) else {
                continue;
            };

            let rest = &line[pos + DIRECTIVE_TOKEN.len()..];
            let fields: Vec<&str> = rest.split_whitespace().collect();
            let [symbol, resource] = fields.as_slice() else {
                error!(
                    line = line_no,
                    text = %line.trim(),
                    "bad syntax for library directive, expecting \"{DIRECTIVE_TOKEN} symbol resource\", \
                     e.g. \"{DIRECTIVE_TOKEN} {DEPS_SYMBOL} {DEPS_RESOURCE}\""
                );
                self.diagnostics.push(ScanDiagnostic::Malformed {
                    line: line_no,
                    text: line.trim().to_string(),
                });
                continue;
            };

            if let Some(previous) = self.declare(symbol, resource) {
                warn!(
                    line = line_no,
                    symbol = %symbol,
                    previous = %previous,
                    resource = %resource,
                    "overriding previously defined library symbol"
                );
                self.diagnostics.push(ScanDiagnostic::Overridden {
                    line: line_no,
                    symbol: symbol.to_string(),
                    previous,
                    resource: resource.to_string(),
                });
            } else {
                debug!(line = line_no, symbol = %symbol, resource = %resource, "declared library");
            }
        }
    }

    /// Map `symbol` to `resource`, returning the resource it replaced.
    pub fn declare(&mut self, symbol: &str, resource: &str) -> Option<String> {
        match self.entries.iter_mut().find(|e| e.symbol == symbol) {
            Some(entry) => Some(std::mem::replace(&mut entry.resource, resource.to_string())),
            None => {
                self.entries.push(LibraryEntry {
                    symbol: symbol.to_string(),
                    resource: resource.to_string(),
                });
                None
            }
        }
    }

    pub fn resolve(&self, symbol: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.resource.as_str())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.resolve(symbol).is_some()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    /// Override warnings recorded by [`scan`](Self::scan).
    pub fn warnings(&self) -> impl Iterator<Item = &ScanDiagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, ScanDiagnostic::Overridden { .. }))
    }

    /// Malformed-directive errors recorded by [`scan`](Self::scan).
    pub fn errors(&self) -> impl Iterator<Item = &ScanDiagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, ScanDiagnostic::Malformed { .. }))
    }
}
