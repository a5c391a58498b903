//! Cooperative cancellation for index builds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag checked between build stages and at
/// iteration boundaries within a stage. Cancellation is cooperative: a
/// stage already past its last checkpoint finishes its work, but nothing
/// after the next checkpoint runs and nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
