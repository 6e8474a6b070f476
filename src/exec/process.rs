// src/exec/process.rs

//! Shell command runner.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

/// How long to keep reading output after the shell itself has exited.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Run `command` through the platform shell in `dir` and wait for it.
///
/// Stdout lines are forwarded to our stdout; stderr lines are logged as
/// warnings. Output from processes the command leaves running in the
/// background is only read for a short grace period after the shell exits.
/// Returns the exit code (`-1` if the process was killed by a signal).
pub async fn run_shell(command: &str, dir: &Path) -> Result<i32> {
    info!(cmd = %command, dir = ?dir, "starting process");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };

    cmd.current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for `{command}`"))?;

    let stdout_task = child.stdout.take().map(|stdout| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{line}");
            }
        })
    });

    let stderr_task = child.stderr.take().map(|stderr| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("stderr: {}", line);
            }
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of `{command}`"))?;

    // Drain what is left of the output, but don't wait on pipes a
    // backgrounded child still holds open.
    let deadline = Instant::now() + OUTPUT_DRAIN_GRACE;
    for mut task in [stdout_task, stderr_task].into_iter().flatten() {
        match timeout_at(deadline, &mut task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "output reader task ended abnormally"),
            Err(_) => {
                debug!(cmd = %command, "output still open after exit; detaching reader");
                task.abort();
            }
        }
    }

    let code = status.code().unwrap_or(-1);
    info!(cmd = %command, exit_code = code, success = status.success(), "process exited");
    Ok(code)
}
