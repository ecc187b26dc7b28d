//! # Preview Pipeline
//!
//! Guard → Transform → Synthesize → Present, synchronously, stopping at the
//! first failing stage.

use crate::PipelineFailure;
use livepad_sandbox::SandboxHost;
use livepad_synthesizer::{synthesize, PreviewDocument};
use std::sync::Arc;

pub struct Pipeline {
    host: Arc<dyn SandboxHost>,
}

impl Pipeline {
    pub fn new(host: Arc<dyn SandboxHost>) -> Self {
        Self { host }
    }

    /// Build the preview document without presenting it
    pub fn prepare(source: &str) -> Result<PreviewDocument, PipelineFailure> {
        livepad_guard::check(source)?;
        tracing::debug!("guard passed");

        let transpiled = livepad_transpiler::transform(source)?;
        tracing::debug!(bytes = transpiled.len(), "transform finished");

        Ok(synthesize(&transpiled))
    }

    /// Build the preview document and hand it to the sandbox
    pub fn run(&self, source: &str) -> Result<PreviewDocument, PipelineFailure> {
        let doc = Self::prepare(source)?;
        self.host.present(&doc)?;
        Ok(doc)
    }
}
