/// Cooperative cancellation for long-running conversions
#[cfg(test)]
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ReliefError, Result};

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a caller can hand one clone to a worker
/// thread and cancel from another. Pipeline stages poll it between rows and
/// facets.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    /// Checks left before the token cancels itself
    #[cfg(test)]
    budget: Option<Arc<AtomicUsize>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is never cancelled by anyone else.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// A token that lets `checks` polls through, then cancels on the next.
    #[cfg(test)]
    pub(crate) fn cancel_after(checks: usize) -> Self {
        Self {
            budget: Some(Arc::new(AtomicUsize::new(checks))),
            ..Self::default()
        }
    }

    /// Return `Err(Cancelled)` once the token has been cancelled.
    pub fn check(&self) -> Result<()> {
        #[cfg(test)]
        if let Some(budget) = &self.budget {
            let spent = budget
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                .is_err();
            if spent {
                self.cancel();
            }
        }
        if self.is_cancelled() {
            Err(ReliefError::Cancelled)
        } else {
            Ok(())
        }
    }
}
