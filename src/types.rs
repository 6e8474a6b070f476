use std::collections::BTreeMap;
use std::fmt;

/// Canonical (hyphen-case) target name.
pub type TargetName = String;

/// Resolved string arguments passed to a target body or a task primitive.
pub type Args = BTreeMap<String, String>;

/// Process exit status for a successful build.
pub const EXIT_SUCCESS: i32 = 0;
/// Generic failure.
pub const EXIT_FAILURE: i32 = 1;
/// The build script could not be located, read or parsed.
pub const EXIT_SCRIPT_NOT_FOUND: i32 = 4;
/// The build script failed validation before any target ran.
pub const EXIT_SCRIPT_INVALID: i32 = 8;

/// Who declares a member of a build program.
///
/// - `Program`: declared directly in the build script.
/// - `Library`: imported from a task library, identified by its registry symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    Program,
    Library(String),
}

impl Owner {
    pub fn is_program(&self) -> bool {
        matches!(self, Owner::Program)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Program => f.write_str("program"),
            Owner::Library(symbol) => f.write_str(symbol),
        }
    }
}

/// Visibility of a program member. Only public members can become targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}
