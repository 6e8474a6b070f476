// tests/shell_exec.rs
//
// Runs real shell commands through `Core.exec` against a temporary directory.

#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scriptdag::dag::TargetCall;
use scriptdag::exec::process::run_shell;
use scriptdag::execute_script;
use scriptdag::fs::RealFileSystem;
use scriptdag::types::EXIT_FAILURE;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

const SCRIPT: &str = r#"
default = "build"

[[member]]
name = "prepare"
steps = [{ cmd = "mkdir -p out" }]

[[member]]
name = "build"
depends = ["prepare"]
steps = [
  { cmd = "echo ${greeting} > out/hello.txt" },
  { task = "Core.exec", args = { command = "exit 3", failonerror = false } },
]

[[member]]
name = "broken"
steps = [{ cmd = "exit 2" }]

[[member]]
name = "background"
steps = [{ cmd = "sleep 3 & echo started > started.txt" }]

[[member]]
name = "nested"
steps = [{ task = "Core.exec", args = { command = "pwd > where.txt", dir = "out" } }]
"#;

#[tokio::test]
async fn commands_run_in_the_script_directory() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let script = dir.path().join("Scriptdag.toml");
    std::fs::write(&script, SCRIPT)?;

    let outcome = with_timeout(execute_script(
        Arc::new(RealFileSystem),
        &script,
        &[],
        &[("greeting".to_string(), "hello".to_string())],
    ))
    .await?;

    assert!(outcome.is_success(), "{:?}", outcome.error());
    let written = std::fs::read_to_string(dir.path().join("out/hello.txt"))?;
    assert_eq!(written.trim(), "hello");

    let outcome = with_timeout(execute_script(
        Arc::new(RealFileSystem),
        &script,
        &[TargetCall::new("nested")],
        &[],
    ))
    .await?;
    assert!(outcome.is_success(), "{:?}", outcome.error());
    let pwd = std::fs::read_to_string(dir.path().join("out/where.txt"))?;
    assert!(pwd.trim().ends_with("/out"), "unexpected pwd {pwd}");

    Ok(())
}

#[tokio::test]
async fn failing_command_fails_the_target() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let script = dir.path().join("Scriptdag.toml");
    std::fs::write(&script, SCRIPT)?;

    let outcome = with_timeout(execute_script(
        Arc::new(RealFileSystem),
        &script,
        &[TargetCall::new("broken")],
        &[],
    ))
    .await?;

    assert_eq!(outcome.exit_code(), EXIT_FAILURE);
    assert_eq!(outcome.executed(), &["broken"]);

    Ok(())
}

#[tokio::test]
async fn backgrounded_children_do_not_hold_the_build() -> TestResult {
    init_tracing();

    let dir = tempdir()?;

    let started = Instant::now();
    let code = with_timeout(run_shell("sleep 3 & echo started", dir.path())).await?;
    assert_eq!(code, 0);
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "exec waited {:?} for a background process",
        started.elapsed()
    );

    let script = dir.path().join("Scriptdag.toml");
    std::fs::write(&script, SCRIPT)?;

    let started = Instant::now();
    let outcome = with_timeout(execute_script(
        Arc::new(RealFileSystem),
        &script,
        &[TargetCall::new("background")],
        &[],
    ))
    .await?;
    assert!(outcome.is_success(), "{:?}", outcome.error());
    assert!(started.elapsed() < Duration::from_secs(1));

    let written = std::fs::read_to_string(dir.path().join("started.txt"))?;
    assert_eq!(written.trim(), "started");

    Ok(())
}
