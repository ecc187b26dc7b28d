use crate::{PreviewDocument, Result, SandboxHost};
use std::sync::Arc;
use tokio::sync::watch;

/// Receiving end of a [`ChannelHost`]; `None` until the first present
pub type DocumentReceiver = watch::Receiver<Option<Arc<PreviewDocument>>>;

/// Hands documents to an embedding page through a single-slot channel.
///
/// Only the latest document is kept; a subscriber that falls behind skips
/// straight to it.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    sender: Arc<watch::Sender<Option<Arc<PreviewDocument>>>>,
}

impl ChannelHost {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> DocumentReceiver {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<PreviewDocument>> {
        self.sender.borrow().clone()
    }
}

impl Default for ChannelHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxHost for ChannelHost {
    fn present(&self, doc: &PreviewDocument) -> Result<()> {
        self.sender.send_replace(Some(Arc::new(doc.clone())));
        tracing::info!(
            bytes = doc.html().len(),
            receivers = self.sender.receiver_count(),
            "presented preview document"
        );
        Ok(())
    }
}
