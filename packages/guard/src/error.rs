use serde::Serialize;
use thiserror::Error;

pub type GuardResult = Result<(), GuardError>;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardError {
    #[error("\"{module}\" is not available. Only React is available in this playground.")]
    DisallowedImport {
        module: String,
        /// Byte range of the offending statement
        span: (usize, usize),
    },
}

impl GuardError {
    pub fn disallowed_import(module: impl Into<String>, span: (usize, usize)) -> Self {
        Self::DisallowedImport {
            module: module.into(),
            span,
        }
    }

    /// Name of the module that tripped the guard
    pub fn module(&self) -> &str {
        match self {
            Self::DisallowedImport { module, .. } => module,
        }
    }

    pub fn span(&self) -> (usize, usize) {
        match self {
            Self::DisallowedImport { span, .. } => *span,
        }
    }
}
