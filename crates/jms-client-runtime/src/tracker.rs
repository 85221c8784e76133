//! Accounting of outstanding provider requests.
//!
//! [`InFlightTracker`] is a [`SynchronizationHook`] shared by every
//! [`CompletionSignal`](crate::completion::CompletionSignal) a producer
//! issues. Because the hook runs before waiters are released, a thread that
//! returns from a wait always sees the count with its own request removed.

use crate::completion::SynchronizationHook;
use crate::error::FailureCause;
use parking_lot::Mutex;
use tracing::{debug, warn};

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;

/// Snapshot of tracker counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerMetrics {
    /// Requests registered but not yet completed
    pub outstanding: u64,

    /// Requests registered since creation
    pub total_requests: u64,

    /// Requests completed successfully
    pub successful_requests: u64,

    /// Requests completed with a failure
    pub failed_requests: u64,
}

/// Counts requests between registration and completion
#[derive(Debug, Default)]
pub struct InFlightTracker {
    state: Mutex<TrackerMetrics>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request about to be issued. Returns the new outstanding count.
    pub fn register(&self) -> u64 {
        let mut state = self.state.lock();
        state.outstanding += 1;
        state.total_requests += 1;
        state.outstanding
    }

    pub fn outstanding(&self) -> u64 {
        self.state.lock().outstanding
    }

    pub fn failures(&self) -> u64 {
        self.state.lock().failed_requests
    }

    pub fn metrics(&self) -> TrackerMetrics {
        *self.state.lock()
    }

    fn complete(&self, failed: bool) -> TrackerMetrics {
        let mut state = self.state.lock();
        match state.outstanding.checked_sub(1) {
            Some(outstanding) => state.outstanding = outstanding,
            None => warn!("Request completed without being registered"),
        }
        if failed {
            state.failed_requests += 1;
        } else {
            state.successful_requests += 1;
        }
        *state
    }
}

impl SynchronizationHook for InFlightTracker {
    fn on_pending_success(&self) {
        let metrics = self.complete(false);
        debug!(outstanding = metrics.outstanding, "Request completed");
    }

    fn on_pending_failure(&self, cause: &FailureCause) {
        let metrics = self.complete(true);
        debug!(
            outstanding = metrics.outstanding,
            failed = metrics.failed_requests,
            error = %cause,
            "Request failed"
        );
    }
}
