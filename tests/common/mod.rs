#![allow(dead_code, unused_imports)]

pub use scriptdag_test_utils::{init_tracing, with_timeout};

use std::path::PathBuf;

use scriptdag::fs::mock::MockFileSystem;

/// Path the in-memory build script lives at.
pub fn script_path() -> PathBuf {
    PathBuf::from("./Scriptdag.toml")
}

/// In-memory filesystem holding a single build script.
pub fn fs_with_script(script: &str) -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file(script_path(), script);
    fs
}
