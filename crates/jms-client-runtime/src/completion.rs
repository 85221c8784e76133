//! Single-assignment completion signal for provider requests.
//!
//! Every asynchronous request handed to the protocol engine is paired with a
//! [`CompletionSignal`]. The engine's thread completes it exactly once, with
//! either success or a failure cause, and any number of application threads
//! block on it until that happens.
//!
//! # Ordering
//!
//! Completion is decided by a single compare-and-set on the signal state.
//! The winning thread stores the failure cause (if any), runs the attached
//! [`SynchronizationHook`] and only then releases the waiters, so anything
//! the hook records is visible to every thread that returns from a wait.

use crate::error::{ClientError, FailureCause};
use crate::interrupt::{self, WaitTarget};
use crate::settings::ClientConfig;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;

const PENDING: u8 = 0;
const COMPLETED: u8 = 1;

/// Callbacks run at completion time, before any waiter is released
#[cfg_attr(test, mockall::automock)]
pub trait SynchronizationHook: Send + Sync {
    /// Called once when the request completes successfully
    fn on_pending_success(&self);

    /// Called once when the request fails, with the stored cause
    fn on_pending_failure(&self, cause: &FailureCause);
}

/// Completion surface the protocol engine drives
pub trait AsyncResult: Send + Sync {
    /// Complete the request successfully
    fn on_success(&self);

    /// Complete the request with a failure
    fn on_failure(&self, cause: FailureCause);

    /// Check whether the request has completed
    fn is_complete(&self) -> bool;
}

/// Wake-up side of the signal, shared with the interrupt registry
struct Latch {
    released: Mutex<bool>,
    condvar: Condvar,
}

impl WaitTarget for Latch {
    fn wake(&self) {
        // Taking the lock orders this wake after a waiter's flag check.
        let _released = self.released.lock();
        self.condvar.notify_all();
    }
}

/// Exactly-once completion latch with blocking waits
pub struct CompletionSignal {
    state: AtomicU8,
    cause: OnceLock<FailureCause>,
    hook: Option<Arc<dyn SynchronizationHook>>,
    latch: Arc<Latch>,
}

impl CompletionSignal {
    /// Create a pending signal without a synchronization hook
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a pending signal that runs `hook` on completion
    pub fn with_hook(hook: Arc<dyn SynchronizationHook>) -> Self {
        Self::build(Some(hook))
    }

    fn build(hook: Option<Arc<dyn SynchronizationHook>>) -> Self {
        Self {
            state: AtomicU8::new(PENDING),
            cause: OnceLock::new(),
            hook,
            latch: Arc::new(Latch {
                released: Mutex::new(false),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Check whether the signal has been completed and its waiters released
    pub fn is_complete(&self) -> bool {
        *self.latch.released.lock()
    }

    /// Stored failure cause, if the signal completed with a failure
    pub fn failure(&self) -> Option<FailureCause> {
        self.cause.get().cloned()
    }

    /// Complete the signal successfully. No effect if already completed.
    pub fn signal_success(&self) {
        if !self.try_complete() {
            trace!("Ignoring success for already completed signal");
            return;
        }

        debug!("Completion signal succeeded");
        if let Some(hook) = &self.hook {
            hook.on_pending_success();
        }
        self.release();
    }

    /// Complete the signal with `error` as its failure cause. No effect if already completed.
    pub fn signal_failure<E>(&self, error: E)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.complete_with_failure(Arc::new(error));
    }

    fn complete_with_failure(&self, cause: FailureCause) {
        if !self.try_complete() {
            trace!(error = %cause, "Ignoring failure for already completed signal");
            return;
        }

        debug!(error = %cause, "Completion signal failed");
        let cause = self.cause.get_or_init(|| cause);
        if let Some(hook) = &self.hook {
            hook.on_pending_failure(cause);
        }
        self.release();
    }

    /// Block until the signal completes.
    ///
    /// # Errors
    ///
    /// - [`ClientError::IoFailure`] if the signal completed with a failure
    /// - [`ClientError::Interrupted`] if the calling thread was interrupted
    pub fn await_indefinite(&self) -> Result<(), ClientError> {
        self.wait_released(None)?;
        self.fail_on_error()
    }

    /// Block for at most `timeout`.
    ///
    /// Returns `true` if the signal completed within the window and `false` if
    /// the window elapsed. A stored failure cause is reported as an error in
    /// both cases.
    ///
    /// # Errors
    ///
    /// - [`ClientError::IoFailure`] if the signal completed with a failure
    /// - [`ClientError::Interrupted`] if the calling thread was interrupted
    pub fn await_timed(&self, timeout: Duration) -> Result<bool, ClientError> {
        // A deadline beyond the clock's range is as good as none.
        let deadline = Instant::now().checked_add(timeout);
        let completed = self.wait_released(deadline)?;
        self.fail_on_error()?;
        Ok(completed)
    }

    /// Wait according to the request timeout configured for the connection.
    ///
    /// # Errors
    ///
    /// As [`await_timed`](Self::await_timed), plus [`ClientError::Timeout`]
    /// when the configured window elapses first.
    pub fn await_configured(&self, config: &ClientConfig) -> Result<(), ClientError> {
        match config.request_timeout() {
            None => self.await_indefinite(),
            Some(timeout) => {
                if self.await_timed(timeout)? {
                    Ok(())
                } else {
                    Err(ClientError::Timeout { duration: timeout })
                }
            }
        }
    }

    fn try_complete(&self) -> bool {
        self.state
            .compare_exchange(PENDING, COMPLETED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        let mut released = self.latch.released.lock();
        *released = true;
        self.latch.condvar.notify_all();
    }

    fn wait_released(&self, deadline: Option<Instant>) -> Result<bool, ClientError> {
        if interrupt::take_current() {
            return Err(ClientError::Interrupted);
        }

        let latch: Arc<dyn WaitTarget> = self.latch.clone();
        let _blocked = interrupt::block_on(latch);
        let mut released = self.latch.released.lock();

        loop {
            if *released {
                return Ok(true);
            }
            if interrupt::take_current() {
                debug!("Wait on completion signal interrupted");
                return Err(ClientError::Interrupted);
            }

            match deadline {
                None => self.latch.condvar.wait(&mut released),
                Some(deadline) => {
                    if self
                        .latch
                        .condvar
                        .wait_until(&mut released, deadline)
                        .timed_out()
                    {
                        return Ok(*released);
                    }
                }
            }
        }
    }

    fn fail_on_error(&self) -> Result<(), ClientError> {
        match self.cause.get() {
            Some(cause) => Err(ClientError::IoFailure {
                cause: Arc::clone(cause),
            }),
            None => Ok(()),
        }
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("complete", &self.is_complete())
            .field("failure", &self.cause.get().map(|cause| cause.to_string()))
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

impl AsyncResult for CompletionSignal {
    fn on_success(&self) {
        self.signal_success();
    }

    fn on_failure(&self, cause: FailureCause) {
        self.complete_with_failure(cause);
    }

    fn is_complete(&self) -> bool {
        CompletionSignal::is_complete(self)
    }
}
