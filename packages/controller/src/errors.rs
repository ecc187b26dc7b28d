//! Error types for the controller

use livepad_guard::GuardError;
use livepad_sandbox::SandboxError;
use livepad_transpiler::TransformError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Controller must be created inside a tokio runtime")]
    NoRuntime,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a pipeline run stopped, by stage
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "camelCase")]
pub enum PipelineFailure {
    /// The source imports something outside the allow-list
    #[error("{message}")]
    Dependency { module: String, message: String },

    /// The source could not be transpiled
    #[error("{message}")]
    Transform {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// The sandbox could not present the document
    #[error("{message}")]
    Sandbox { message: String },
}

impl PipelineFailure {
    pub fn message(&self) -> &str {
        match self {
            PipelineFailure::Dependency { message, .. }
            | PipelineFailure::Transform { message, .. }
            | PipelineFailure::Sandbox { message } => message,
        }
    }
}

impl From<GuardError> for PipelineFailure {
    fn from(e: GuardError) -> Self {
        PipelineFailure::Dependency {
            module: e.module().to_string(),
            message: e.to_string(),
        }
    }
}

impl From<TransformError> for PipelineFailure {
    fn from(e: TransformError) -> Self {
        PipelineFailure::Transform {
            line: e.line,
            column: e.column,
            message: e.message,
        }
    }
}

impl From<SandboxError> for PipelineFailure {
    fn from(e: SandboxError) -> Self {
        PipelineFailure::Sandbox {
            message: e.to_string(),
        }
    }
}
