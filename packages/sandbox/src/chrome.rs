//! Preview execution in headless Chrome

use crate::server::DocumentServer;
use crate::{PreviewDocument, Result, SandboxError, SandboxHost, SandboxPolicy};
use headless_chrome::{Browser, LaunchOptions, Tab};
use livepad_synthesizer::MOUNT_ID;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct ActivePreview {
    tab: Arc<Tab>,
    // held so the document stays reachable while the tab is open
    _server: DocumentServer,
}

/// Runs every document in its own tab, behind the sandbox CSP.
///
/// Presenting closes the previous tab first, so nothing from an earlier
/// document survives into the next one.
pub struct ChromeHost {
    browser: Browser,
    policy: SandboxPolicy,
    settle_timeout: Duration,
    active: Mutex<Option<ActivePreview>>,
}

impl ChromeHost {
    /// Launch a headless browser
    pub fn new() -> Result<Self> {
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .map_err(|e| SandboxError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            policy: SandboxPolicy::default(),
            settle_timeout: Duration::from_secs(5),
            active: Mutex::new(None),
        })
    }

    /// How long [`ChromeHost::mount_contents`] waits for the mount target to fill
    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Inner HTML of the mount target in the current tab.
    ///
    /// React renders asynchronously, so this polls until the target is
    /// non-empty or the settle timeout passes.
    pub fn mount_contents(&self) -> Result<String> {
        let tab = {
            let active = self.lock_active()?;
            match active.as_ref() {
                Some(preview) => Arc::clone(&preview.tab),
                None => return Err(SandboxError::NothingPresented),
            }
        };

        let script = format!(
            "(function () {{ var el = document.getElementById('{}'); return el ? el.innerHTML : ''; }})()",
            MOUNT_ID
        );
        let deadline = Instant::now() + self.settle_timeout;

        loop {
            let contents = tab
                .evaluate(&script, false)
                .map_err(|e| SandboxError::Browser(e.to_string()))?
                .value
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();

            if !contents.is_empty() || Instant::now() >= deadline {
                return Ok(contents);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn lock_active(&self) -> Result<std::sync::MutexGuard<'_, Option<ActivePreview>>> {
        self.active
            .lock()
            .map_err(|_| SandboxError::Browser("preview state poisoned".to_string()))
    }
}

impl SandboxHost for ChromeHost {
    fn present(&self, doc: &PreviewDocument) -> Result<()> {
        let mut active = self.lock_active()?;

        if let Some(previous) = active.take() {
            if let Err(e) = previous.tab.close(true) {
                tracing::warn!("failed to close previous preview tab: {}", e);
            }
        }

        let server = DocumentServer::start(
            doc.html().to_string(),
            &self.policy.content_security_policy(),
        )?;

        let tab = self
            .browser
            .new_tab()
            .map_err(|e| SandboxError::Browser(e.to_string()))?;

        tab.navigate_to(&server.url())
            .map_err(|e| SandboxError::Browser(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| SandboxError::Browser(e.to_string()))?;

        tracing::info!(url = %server.url(), "presented preview document in headless tab");

        *active = Some(ActivePreview {
            tab,
            _server: server,
        });
        Ok(())
    }
}

impl Drop for ChromeHost {
    fn drop(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            if let Some(preview) = active.take() {
                let _ = preview.tab.close(true);
            }
        }
    }
}
