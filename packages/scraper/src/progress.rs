//! Progress reporting for crawls and fetch batches.
//!
//! The crawler and the record fetch loop report through
//! [`ProgressCallback`] so that callers decide how (or whether) progress is
//! shown. The CLI plugs in an `indicatif` bar; tests use [`NullProgress`].

use std::sync::Arc;

/// Receiver of progress updates for one unit of long-running work.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total number of steps, once known.
    fn set_total(&self, total: u64);

    /// Advances by `delta` steps.
    fn inc(&self, delta: u64);

    /// Replaces the status message.
    fn set_message(&self, msg: String);

    /// Marks the work as finished.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
