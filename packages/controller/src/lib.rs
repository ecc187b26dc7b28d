//! # Livepad Controller
//!
//! Runs the preview pipeline on every edit, after a quiet period:
//!
//! ```text
//! on_change ──► Pending ──(quiet period)──► Running
//!                  ▲                           │ guard ► transform ► synthesize ► present
//!                  │                           ├──► Idle
//!                  └──────── next edit ────────┴──► Failed(PipelineFailure)
//! ```
//!
//! Only the last edit of a burst is processed. Failures are published as
//! state; they never stop the controller.

mod controller;
mod debounce;
mod errors;
mod pipeline;

pub use controller::{Controller, ControllerState, ControllerStatus, PipelineRun, RunOutcome};
pub use debounce::DebounceSlot;
pub use errors::{ControllerError, PipelineFailure};
pub use pipeline::Pipeline;

use std::time::Duration;

/// Quiet period used when none is configured
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);
