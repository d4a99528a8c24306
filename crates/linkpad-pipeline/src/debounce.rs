//! Debouncing for render requests.
//!
//! Rapid edits produce bursts of render requests. The debouncer keeps only
//! the newest text and releases it once a quiet period has passed without
//! further edits, so a single render covers the whole burst.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Text waiting for its quiet period to elapse.
struct PendingRender {
    text: String,
    deadline: Instant,
}

/// Thread-safe, single-slot debouncer for document text.
///
/// Recording replaces any pending text and restarts the quiet period, so
/// the newest text always wins and intermediate states are never rendered.
pub struct RenderDebouncer {
    pending: Mutex<Option<PendingRender>>,
    quiet_period: Duration,
}

impl RenderDebouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            pending: Mutex::new(None),
            quiet_period,
        }
    }

    /// Record document text for rendering.
    ///
    /// Thread-safe, can be called from the file watcher callback. Replaces
    /// any pending text and pushes the deadline out by the quiet period.
    pub fn record(&self, text: impl Into<String>) {
        let mut pending = self.pending.lock().unwrap();
        *pending = Some(PendingRender {
            text: text.into(),
            deadline: Instant::now() + self.quiet_period,
        });
    }

    /// Take the pending text if its deadline has passed.
    ///
    /// Thread-safe, called from the pipeline driver task.
    pub fn drain_ready(&self) -> Option<String> {
        let mut pending = self.pending.lock().unwrap();
        if pending
            .as_ref()
            .is_some_and(|p| p.deadline <= Instant::now())
        {
            pending.take().map(|p| p.text)
        } else {
            None
        }
    }

    /// Take the pending text immediately, ignoring the deadline.
    ///
    /// Used when something else forces a render anyway and the freshest
    /// text should be the one that renders.
    pub fn take_pending(&self) -> Option<String> {
        self.pending.lock().unwrap().take().map(|p| p.text)
    }

    /// Drop any pending text without rendering it.
    pub fn cancel(&self) {
        self.pending.lock().unwrap().take();
    }

    /// Returns the pending deadline, for timer scheduling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.lock().unwrap().as_ref().map(|p| p.deadline)
    }
}
