//! # Livepad Sandbox
//!
//! The only place user code is allowed to run.
//!
//! A [`SandboxHost`] receives a finished [`PreviewDocument`] and executes it
//! in an isolated context: no access to the host page, no network beyond the
//! two runtime scripts, no messages back. Every present replaces the previous
//! document completely.
//!
//! Two hosts are provided:
//!
//! - [`ChannelHost`] hands documents to the playground page, whose iframe
//!   applies the [`SandboxPolicy`] through its `sandbox` attribute.
//! - `ChromeHost` (feature `chrome`) runs each document in a fresh headless
//!   Chrome tab served with the same policy as a `Content-Security-Policy`.

mod channel;
#[cfg(feature = "chrome")]
mod chrome;
mod policy;
#[cfg(feature = "chrome")]
mod server;

pub use channel::{ChannelHost, DocumentReceiver};
#[cfg(feature = "chrome")]
pub use chrome::ChromeHost;
pub use livepad_synthesizer::PreviewDocument;
pub use policy::SandboxPolicy;
#[cfg(feature = "chrome")]
pub use server::DocumentServer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("No document has been presented")]
    NothingPresented,
}

pub type Result<T> = std::result::Result<T, SandboxError>;

/// An isolated execution context for preview documents
pub trait SandboxHost: Send + Sync {
    /// Replace whatever is running with `doc`
    fn present(&self, doc: &PreviewDocument) -> Result<()>;
}
