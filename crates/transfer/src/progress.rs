use std::sync::Arc;

use tokio::sync::mpsc;

/// Callback invoked with upload progress.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// A `(completed, total)` progress report.
///
/// Values are best-effort units, not a precise percentage: the first
/// report of an attempt is `(1, 100)`, chunk reports use
/// `(chunk_index, chunk_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Heartbeat emitted when an attempt starts.
    pub const STARTED: Progress = Progress {
        completed: 1,
        total: 100,
    };

    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }
}

/// Returns a callback that forwards every report into a channel.
pub fn channel() -> (ProgressCallback, mpsc::UnboundedReceiver<Progress>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback: ProgressCallback = Arc::new(move |p| {
        // Receiver gone means nobody is listening any more.
        let _ = tx.send(p);
    });
    (callback, rx)
}

/// A callback that discards every report.
pub fn noop() -> ProgressCallback {
    Arc::new(|_| {})
}
