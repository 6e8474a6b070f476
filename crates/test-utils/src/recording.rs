use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use scriptdag::engine::{BuildEvent, BuildListener};
use scriptdag::errors::TargetError;
use scriptdag::library::{StaticLibrary, TaskPrimitive};
use scriptdag::program::{body_fn, BoxFuture, TargetBody};
use scriptdag::types::Args;

/// Shared, ordered log of what ran. Clones append to the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

/// `name`, or `name(k=v,...)` when arguments were passed.
fn describe(name: &str, args: &Args) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let rendered: Vec<String> = args.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{name}({})", rendered.join(","))
}

/// Body that records its name (and arguments) and succeeds.
pub fn recording_body(log: &CallLog, name: &str) -> Arc<dyn TargetBody> {
    let log = log.clone();
    let name = name.to_string();
    body_fn(move |_, args| {
        log.record(describe(&name, args));
        Ok(())
    })
}

/// Body that records its name and fails with `message`.
pub fn failing_body(log: &CallLog, name: &str, message: &str) -> Arc<dyn TargetBody> {
    let log = log.clone();
    let name = name.to_string();
    let message = message.to_string();
    body_fn(move |_, _| {
        log.record(name.clone());
        Err(TargetError::Failed(anyhow!("{message}")))
    })
}

/// Body that records its name and raises the abrupt-termination signal.
pub fn exiting_body(log: &CallLog, name: &str, status: i32) -> Arc<dyn TargetBody> {
    let log = log.clone();
    let name = name.to_string();
    body_fn(move |_, _| {
        log.record(name.clone());
        Err(TargetError::Exit(status))
    })
}

/// Listener that flattens lifecycle events into strings:
/// `build-started`, `target-started:x`, `target-finished:x:ok|err`,
/// `build-finished:ok|err`.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    log: CallLog,
}

impl RecordingListener {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl BuildListener for RecordingListener {
    fn on_event(&mut self, event: &BuildEvent<'_>) {
        let entry = match event {
            BuildEvent::BuildStarted => "build-started".to_string(),
            BuildEvent::TargetStarted { target } => format!("target-started:{target}"),
            BuildEvent::TargetFinished { target, error } => {
                let status = if error.is_some() { "err" } else { "ok" };
                format!("target-finished:{target}:{status}")
            }
            BuildEvent::BuildFinished { error } => {
                let status = if error.is_some() { "err" } else { "ok" };
                format!("build-finished:{status}")
            }
        };
        self.log.record(entry);
    }
}

struct RecordTask {
    log: CallLog,
    task: String,
}

impl TaskPrimitive for RecordTask {
    fn run<'a>(
        &'a self,
        _ctx: &'a mut scriptdag::engine::BuildContext,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<(), TargetError>> {
        Box::pin(async move {
            self.log.record(describe(&self.task, args));
            Ok(())
        })
    }
}

/// Task library whose tasks (`record`, `note`) only append to `log`.
pub fn recording_library(name: &str, log: &CallLog) -> StaticLibrary {
    let mut library = StaticLibrary::new(name);
    for task in ["record", "note"] {
        library = library.with_task(
            task,
            Arc::new(RecordTask {
                log: log.clone(),
                task: format!("{name}.{task}"),
            }),
        );
    }
    library
}
