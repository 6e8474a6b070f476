// src/engine/listener.rs

use std::time::Instant;

use tracing::{error, info};

use crate::engine::outcome::BuildError;
use crate::errors::TargetError;

/// Lifecycle notification fired by the engine.
#[derive(Debug, Clone, Copy)]
pub enum BuildEvent<'a> {
    BuildStarted,
    TargetStarted {
        target: &'a str,
    },
    TargetFinished {
        target: &'a str,
        error: Option<&'a TargetError>,
    },
    /// Fired exactly once per run, on every exit path.
    BuildFinished {
        error: Option<&'a BuildError>,
    },
}

/// Observer of lifecycle notifications.
pub trait BuildListener: Send {
    fn on_event(&mut self, event: &BuildEvent<'_>);
}

/// Ordered list of listeners; events are delivered in registration order.
#[derive(Default)]
pub struct ListenerBus {
    listeners: Vec<Box<dyn BuildListener>>,
}

impl ListenerBus {
    pub fn add(&mut self, listener: Box<dyn BuildListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn fire(&mut self, event: &BuildEvent<'_>) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(event);
        }
    }
}

/// Default listener: reports targets and the final result through `tracing`.
#[derive(Debug, Default)]
pub struct LoggingListener {
    started: Option<Instant>,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildListener for LoggingListener {
    fn on_event(&mut self, event: &BuildEvent<'_>) {
        match event {
            BuildEvent::BuildStarted => {
                self.started = Some(Instant::now());
            }
            BuildEvent::TargetStarted { target } => {
                info!("{target}:");
            }
            BuildEvent::TargetFinished {
                target,
                error: Some(TargetError::Failed(err)),
            } => {
                error!(target_name = %target, "target failed: {err:#}");
            }
            BuildEvent::TargetFinished { .. } => {}
            BuildEvent::BuildFinished { error: err } => {
                let elapsed = self
                    .started
                    .map(|start| start.elapsed().as_secs_f64())
                    .unwrap_or_default();
                match err {
                    None => info!("BUILD SUCCESSFUL"),
                    Some(err) => error!("BUILD FAILED: {err}"),
                }
                info!("Total time: {elapsed:.3} seconds");
            }
        }
    }
}
