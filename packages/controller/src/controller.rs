//! # Debounced Pipeline Controller
//!
//! Owns the source buffer and drives the [`Pipeline`] from edits.

use crate::{ControllerError, DebounceSlot, Pipeline, PipelineFailure};
use livepad_sandbox::SandboxHost;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// What the controller is doing right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ControllerState {
    Idle,
    /// An edit arrived and the quiet period is running
    Pending,
    Running,
    /// The last run failed; shown until the next edit
    Failed(PipelineFailure),
}

/// Published on every state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatus {
    /// Version of the most recent run, 0 before the first one
    pub version: u64,
    #[serde(flatten)]
    pub state: ControllerState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Presented,
    Failed(PipelineFailure),
}

/// One pipeline execution over a snapshot of the source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub version: u64,
    pub outcome: RunOutcome,
}

struct Inner {
    pipeline: Pipeline,
    source: watch::Sender<String>,
    status: watch::Sender<ControllerStatus>,
    run_lock: Mutex<()>,
    versions: AtomicU64,
    edits: AtomicU64,
}

/// Cheap to clone; clones share the same buffer and timer
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
    slot: Arc<DebounceSlot>,
    runtime: Handle,
}

impl Controller {
    /// Create a controller on the current tokio runtime
    pub fn new(host: Arc<dyn SandboxHost>, quiet_period: Duration) -> Result<Self, ControllerError> {
        let runtime = Handle::try_current().map_err(|_| ControllerError::NoRuntime)?;
        let (source, _) = watch::channel(String::new());
        let (status, _) = watch::channel(ControllerStatus {
            version: 0,
            state: ControllerState::Idle,
        });

        Ok(Self {
            inner: Arc::new(Inner {
                pipeline: Pipeline::new(host),
                source,
                status,
                run_lock: Mutex::new(()),
                versions: AtomicU64::new(0),
                edits: AtomicU64::new(0),
            }),
            slot: Arc::new(DebounceSlot::new(quiet_period)),
            runtime,
        })
    }

    /// Replace the source buffer and (re)start the quiet period
    pub fn on_change(&self, text: impl Into<String>) {
        self.inner.source.send_replace(text.into());
        self.inner.edits.fetch_add(1, Ordering::SeqCst);
        self.inner.publish_state(ControllerState::Pending);

        let inner = Arc::clone(&self.inner);
        self.slot.arm(&self.runtime, move || {
            inner.execute();
        });
    }

    /// Read `path` and treat its contents as an edit
    pub fn on_file_change(&self, path: &Path) -> Result<(), ControllerError> {
        let text = std::fs::read_to_string(path)?;
        if text == self.source() {
            return Ok(());
        }
        tracing::debug!(path = %path.display(), "source file changed");
        self.on_change(text);
        Ok(())
    }

    /// Current source buffer
    pub fn source(&self) -> String {
        self.inner.source.borrow().clone()
    }

    /// Follow the source buffer, e.g. to keep several editors in sync
    pub fn subscribe_source(&self) -> watch::Receiver<String> {
        self.inner.source.subscribe()
    }

    /// Run the pipeline on the current buffer immediately, skipping the
    /// quiet period and cancelling any armed timer.
    ///
    /// Blocks while the sandbox presents; call it from a blocking context.
    pub fn run_now(&self) -> PipelineRun {
        self.slot.cancel();
        self.inner.execute()
    }

    pub fn status(&self) -> ControllerStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerStatus> {
        self.inner.status.subscribe()
    }

    pub fn quiet_period(&self) -> Duration {
        self.slot.delay()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_armed()
    }
}

impl Inner {
    fn execute(&self) -> PipelineRun {
        let _running = lock(&self.run_lock);
        let edit = self.edits.load(Ordering::SeqCst);
        let source = self.source.borrow().clone();
        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;

        self.publish(edit, version, ControllerState::Running);
        tracing::debug!(version, bytes = source.len(), "pipeline run started");

        let outcome = match self.pipeline.run(&source) {
            Ok(doc) => {
                tracing::info!(version, default_export = ?doc.default_export(), "preview updated");
                self.publish(edit, version, ControllerState::Idle);
                RunOutcome::Presented
            }
            Err(failure) => {
                tracing::warn!(version, "pipeline run failed: {}", failure);
                self.publish(edit, version, ControllerState::Failed(failure.clone()));
                RunOutcome::Failed(failure)
            }
        };

        PipelineRun { version, outcome }
    }

    fn publish_state(&self, state: ControllerState) {
        self.status.send_modify(|status| status.state = state);
    }

    /// Publish the state of a run that started at edit `edit`. A newer edit
    /// keeps its `Pending` state; only the version moves on.
    fn publish(&self, edit: u64, version: u64, state: ControllerState) {
        if self.edits.load(Ordering::SeqCst) == edit {
            self.status.send_replace(ControllerStatus { version, state });
        } else {
            self.status.send_modify(|status| status.version = version);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
