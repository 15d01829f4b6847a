//! Run context
//!
//! Every long-running operation receives a [`RunContext`] instead of reaching
//! for shared global state. It carries the cooperative cancellation flag and
//! the progress reporter; log output goes through `tracing`.

use std::sync::Arc;
use tokio::sync::watch;

/// Receives progress updates from a run
///
/// "Main" tracks the outer loop (clusters, report files) and "sub" the inner
/// loop (items within a cluster).
pub trait ProgressReporter: Send + Sync {
    /// Sets the main status line
    fn main_status(&self, message: &str);

    /// Sets the secondary status line
    fn sub_status(&self, message: &str);

    /// Logs a message without changing status
    fn message(&self, message: &str);

    /// Outer loop position
    fn main_progress(&self, current: usize, total: usize);

    /// Inner loop position
    fn sub_progress(&self, current: usize, total: usize);
}

/// Progress reporter that writes to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn main_status(&self, message: &str) {
        tracing::info!(status = %message, "Status");
    }

    fn sub_status(&self, message: &str) {
        tracing::info!(sub_status = %message, "Status");
    }

    fn message(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn main_progress(&self, current: usize, total: usize) {
        tracing::debug!(current, total, "Main progress");
    }

    fn sub_progress(&self, current: usize, total: usize) {
        tracing::trace!(current, total, "Sub progress");
    }
}

/// Cancellation flag and progress sink for one run
#[derive(Clone)]
pub struct RunContext {
    cancel: watch::Receiver<bool>,
    progress: Arc<dyn ProgressReporter>,
}

impl RunContext {
    /// Creates a context that observes a shutdown channel
    ///
    /// Sending `true` on the channel requests cancellation.
    pub fn new(cancel: watch::Receiver<bool>) -> Self {
        Self {
            cancel,
            progress: Arc::new(TracingProgress),
        }
    }

    /// Creates a context that is never cancelled
    pub fn detached() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self::new(rx)
    }

    /// Replaces the progress reporter
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// The progress reporter
    pub fn progress(&self) -> &dyn ProgressReporter {
        self.progress.as_ref()
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
