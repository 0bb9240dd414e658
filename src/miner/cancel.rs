use crate::error::MiningError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A cloneable handle for aborting a mining run between recursion steps.
///
/// Clones share the same flag, so a token handed to a miner can be cancelled
/// from another thread. A deadline is measured from the moment it was attached;
/// a token with several deadlines trips at the earliest one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadlines: Vec<(Instant, Duration)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also trips once `timeout` has elapsed.
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadlines: vec![(Instant::now(), timeout)],
        }
    }

    /// A token sharing this token's cancel flag and deadlines, plus one more
    /// deadline starting now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut deadlines = self.deadlines.clone();
        deadlines.push((Instant::now(), timeout));
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadlines,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails if the run should stop before doing any more work.
    pub fn checkpoint(&self) -> Result<(), MiningError> {
        if self.is_cancelled() {
            return Err(MiningError::Cancelled);
        }
        for (started, timeout) in &self.deadlines {
            let elapsed = started.elapsed();
            if elapsed >= *timeout {
                return Err(MiningError::DeadlineExceeded {
                    elapsed_ms: elapsed.as_millis(),
                });
            }
        }
        Ok(())
    }
}
