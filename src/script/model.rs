// src/script/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level build script as read from TOML.
///
/// Members are an array of tables so their declaration order survives
/// parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawScript {
    /// Program name; defaults to the script's file stem.
    #[serde(default)]
    pub name: Option<String>,

    /// Target to run when none is requested.
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub member: Vec<RawMember>,
}

/// `[[member]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMember {
    /// Display name, usually camelCase; the target name is its hyphenated form.
    pub name: String,

    #[serde(default)]
    pub doc: Option<String>,

    /// Explicit target marker.
    #[serde(default)]
    pub target: bool,

    /// Dependencies; declaring them also marks the member as a target.
    #[serde(default)]
    pub depends: Option<Vec<String>>,

    /// Private members are never targets.
    #[serde(default)]
    pub private: bool,

    /// Library symbol the member is imported from.
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub params: Vec<RawParam>,

    #[serde(default)]
    pub steps: Vec<RawStep>,
}

impl RawMember {
    pub fn has_marker(&self) -> bool {
        self.target || self.depends.is_some()
    }
}

/// Formal parameter; a `default` makes it optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParam {
    pub name: String,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub doc: Option<String>,
}

/// One step of a member body: either `task = "Symbol.task"` with `args`, or
/// the `cmd = "..."` shorthand for the core library's `exec`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawStep {
    #[serde(default)]
    pub task: Option<String>,

    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub args: BTreeMap<String, toml::Value>,
}
