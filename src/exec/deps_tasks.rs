// src/exec/deps_tasks.rs

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::anyhow;
use tracing::info;

use crate::engine::BuildContext;
use crate::errors::TargetError;
use crate::exec::core_tasks::sync_task;
use crate::exec::required;
use crate::library::StaticLibrary;
use crate::types::Args;

/// `Deps.require`: make sure a program is installed.
///
/// Searches `path` (a platform path list) or `PATH` for `program`. When
/// `property` is given, the resolved location is stored in that property.
fn require(ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let program = required(args, "require", "program")?;
    let search: Option<OsString> = match args.get("path") {
        Some(path) => Some(OsString::from(path)),
        None => std::env::var_os("PATH"),
    };

    let fs = ctx.fs();
    let found = search
        .iter()
        .flat_map(std::env::split_paths)
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| fs.is_file(candidate));

    match found {
        Some(location) => {
            info!(program = %program, location = ?location, "found required program");
            if let Some(property) = args.get("property") {
                ctx.set_property(property.as_str(), location.display().to_string());
            }
            Ok(())
        }
        None => Err(TargetError::Failed(anyhow!(
            "required program '{program}' was not found on the search path"
        ))),
    }
}

fn candidates(dir: &std::path::Path, program: &str) -> Vec<PathBuf> {
    let mut out = vec![dir.join(program)];
    if cfg!(windows) {
        out.push(dir.join(format!("{program}.exe")));
    }
    out
}

/// The built-in dependency-management library.
pub fn deps_library() -> StaticLibrary {
    StaticLibrary::new("deps").with_task("require", sync_task(require))
}
