//! Cooperative cancellation for batch synthesis.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation signal.
///
/// Starting a new upload must cancel any in-flight synthesis before the next
/// one begins; the caller keeps one clone and hands another to
/// [`synthesize`](crate::synthesize::synthesize), which checks it between
/// groups. Cancellation is a clean early termination, not an error: partial
/// results from a cancelled run are discarded and never surfaced.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once any clone has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
