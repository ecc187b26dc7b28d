//! Single-slot quiet-period timer

use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Holds at most one armed timer. Arming again cancels the previous one, so
/// only the last call within a quiet period fires.
pub struct DebounceSlot {
    delay: Duration,
    armed: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            armed: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` on `runtime`'s blocking pool once the quiet period passes
    /// without another arm
    pub fn arm<F>(&self, runtime: &Handle, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let mut armed = self.armed.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(previous) = armed.take() {
            previous.abort();
        }

        *armed = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = tokio::task::spawn_blocking(task).await {
                tracing::error!("debounced task failed: {}", e);
            }
        }));
    }

    /// Cancel the armed timer, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        let mut armed = self.armed.lock().unwrap_or_else(|e| e.into_inner());
        match armed.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        let armed = self.armed.lock().unwrap_or_else(|e| e.into_inner());
        armed.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_quiet_period() {
        let slot = DebounceSlot::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        slot.arm(&Handle::current(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(slot.is_armed());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!slot.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_arm_wins() {
        let slot = DebounceSlot::new(Duration::from_millis(300));
        let fired = Arc::new(Mutex::new(Vec::new()));

        for value in 0..5 {
            let fired = fired.clone();
            slot.arm(&Handle::current(), move || {
                fired.lock().unwrap().push(value);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*fired.lock().unwrap(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_off_the_async_worker() {
        let slot = DebounceSlot::new(Duration::from_millis(300));
        let (tx, rx) = tokio::sync::oneshot::channel();
        let test_thread = std::thread::current().id();

        slot.arm(&Handle::current(), move || {
            let _ = tx.send(std::thread::current().id());
        });

        let task_thread = rx.await.unwrap();
        assert_ne!(task_thread, test_thread);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let slot = DebounceSlot::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        slot.arm(&Handle::current(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(slot.cancel());
        assert!(!slot.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
