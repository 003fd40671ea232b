// src/crawl/shutdown.rs
// =============================================================================
// Cooperative cancellation for the worker pool.
//
// Cancelling never kills a task. It flips a flag that workers check at the
// top of every loop iteration, and wakes anyone currently waiting so they get
// to that check promptly. A worker in the middle of a fetch finishes that one
// fetch first.
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A cloneable handle to request that a crawl stop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Calling it more than once is harmless.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent cancel()
            // cannot slip between the check and the await
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
