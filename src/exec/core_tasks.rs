// src/exec/core_tasks.rs

use std::sync::Arc;

use anyhow::{anyhow, Context};
use tracing::{debug, info};

use crate::engine::BuildContext;
use crate::errors::TargetError;
use crate::exec::{flag, process, required};
use crate::library::{StaticLibrary, TaskPrimitive};
use crate::program::BoxFuture;
use crate::types::Args;

/// Adapter for tasks that never await.
struct SyncTask<F>(F);

impl<F> TaskPrimitive for SyncTask<F>
where
    F: Fn(&mut BuildContext, &Args) -> Result<(), TargetError> + Send + Sync,
{
    fn run<'a>(
        &'a self,
        ctx: &'a mut BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>> {
        Box::pin(async move { (self.0)(ctx, args) })
    }
}

pub(crate) fn sync_task<F>(f: F) -> Arc<dyn TaskPrimitive>
where
    F: Fn(&mut BuildContext, &Args) -> Result<(), TargetError> + Send + Sync + 'static,
{
    Arc::new(SyncTask(f))
}

/// `Core.exec`: run `command` in the platform shell.
///
/// Arguments: `command`, optional `dir` (relative to the base directory) and
/// `failonerror` (default `true`).
struct ExecTask;

impl TaskPrimitive for ExecTask {
    fn run<'a>(
        &'a self,
        ctx: &'a mut BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>> {
        Box::pin(async move {
            let command = required(args, "exec", "command")?;
            let dir = match args.get("dir") {
                Some(dir) => ctx.resolve_path(dir),
                None => ctx.base_dir().to_path_buf(),
            };

            let code = process::run_shell(command, &dir).await?;
            if code != 0 {
                if flag(args, "failonerror", true) {
                    return Err(TargetError::Failed(anyhow!(
                        "command `{command}` exited with status {code}"
                    )));
                }
                info!(cmd = %command, exit_code = code, "command failed; continuing (failonerror=false)");
            }
            Ok(())
        })
    }
}

fn echo(_ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let message = args.get("message").map(String::as_str).unwrap_or_default();
    println!("{message}");
    Ok(())
}

fn fail(_ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let message = args
        .get("message")
        .map(String::as_str)
        .unwrap_or("build failed");
    Err(TargetError::Failed(anyhow!("{message}")))
}

/// Abrupt-termination signal. `status` defaults to 0, a clean stop.
fn exit(_ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let status = match args.get("status") {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid exit status '{raw}'"))?,
        None => 0,
    };
    Err(TargetError::Exit(status))
}

fn property(ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let name = required(args, "property", "name")?;
    let value = required(args, "property", "value")?;
    if ctx.set_property(name, value) {
        debug!(property = %name, value = %value, "property set");
    }
    Ok(())
}

fn mkdir(ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let dir = ctx.resolve_path(required(args, "mkdir", "dir")?);
    ctx.fs().create_dir_all(&dir)?;
    info!(dir = ?dir, "created dir");
    Ok(())
}

fn write(ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let file = ctx.resolve_path(required(args, "write", "file")?);
    let content = args.get("content").map(String::as_str).unwrap_or_default();
    ctx.fs().write(&file, content.as_bytes())?;
    debug!(file = ?file, bytes = content.len(), "wrote file");
    Ok(())
}

/// Deleting a missing path is not an error.
fn delete(ctx: &mut BuildContext, args: &Args) -> Result<(), TargetError> {
    let path = ctx.resolve_path(required(args, "delete", "path")?);
    let fs = ctx.fs();
    if fs.exists(&path) {
        fs.remove_path(&path)?;
        info!(path = ?path, "deleted");
    } else {
        debug!(path = ?path, "nothing to delete");
    }
    Ok(())
}

/// The built-in core library.
pub fn core_library() -> StaticLibrary {
    StaticLibrary::new("core")
        .with_task("echo", sync_task(echo))
        .with_task("exec", Arc::new(ExecTask))
        .with_task("fail", sync_task(fail))
        .with_task("exit", sync_task(exit))
        .with_task("property", sync_task(property))
        .with_task("mkdir", sync_task(mkdir))
        .with_task("write", sync_task(write))
        .with_task("delete", sync_task(delete))
}
