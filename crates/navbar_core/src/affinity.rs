//! UI thread affinity
//!
//! UI state is single-writer: it must only be mutated from the thread that
//! created it. Debug builds assert this at every mutating entry point; release
//! builds log the violation and carry on.

use std::thread::{self, ThreadId};

/// Records the owning thread of a piece of UI state
#[derive(Clone, Copy, Debug)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    /// Bind to the current thread
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Assert (debug builds only) that we are on the owning thread
    #[inline]
    #[track_caller]
    pub fn check(&self, operation: &'static str) {
        if !self.is_owner() {
            tracing::error!("{} called off the owning UI thread", operation);
            debug_assert!(false, "{operation} called off the owning UI thread");
        }
    }
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}
