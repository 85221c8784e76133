//! Cooperative interruption of threads blocked in a completion wait.
//!
//! Every thread owns an interrupt flag. Any other thread holding that
//! thread's [`InterruptHandle`] may raise the flag; a thread blocked in
//! [`CompletionSignal::await_indefinite`](crate::CompletionSignal::await_indefinite)
//! or [`CompletionSignal::await_timed`](crate::CompletionSignal::await_timed)
//! is woken, clears its flag and fails with
//! [`ClientError::Interrupted`](crate::ClientError::Interrupted).

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;

thread_local! {
    static CURRENT: Arc<InterruptState> = Arc::new(InterruptState::default());
}

/// Something a blocked thread is parked on and that can be woken from outside.
pub(crate) trait WaitTarget: Send + Sync {
    /// Wake every thread parked on this target so it re-checks its condition
    fn wake(&self);
}

#[derive(Default)]
struct InterruptState {
    interrupted: AtomicBool,
    blocked_on: Mutex<Option<Arc<dyn WaitTarget>>>,
}

/// Handle used to interrupt a specific thread
#[derive(Clone)]
pub struct InterruptHandle {
    state: Arc<InterruptState>,
}

impl InterruptHandle {
    /// Raise the interrupt flag and wake the owning thread if it is blocked
    pub fn interrupt(&self) {
        self.state.interrupted.store(true, Ordering::SeqCst);

        // Clone out so the registry lock is not held while waking.
        let target = self.state.blocked_on.lock().clone();
        if let Some(target) = target {
            target.wake();
        }
    }

    /// Check the interrupt flag without clearing it
    pub fn is_interrupted(&self) -> bool {
        self.state.interrupted.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptHandle")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

/// Get the interrupt handle of the calling thread
pub fn current() -> InterruptHandle {
    CURRENT.with(|state| InterruptHandle {
        state: Arc::clone(state),
    })
}

/// Return and clear the calling thread's interrupt flag
pub fn take_current() -> bool {
    CURRENT.with(|state| state.interrupted.swap(false, Ordering::SeqCst))
}

/// Registration of the calling thread as blocked on a wait target.
///
/// Deregisters on drop.
pub(crate) struct BlockedOn {
    state: Arc<InterruptState>,
}

impl Drop for BlockedOn {
    fn drop(&mut self) {
        self.state.blocked_on.lock().take();
    }
}

/// Register the calling thread as blocked on `target` until the guard drops
pub(crate) fn block_on(target: Arc<dyn WaitTarget>) -> BlockedOn {
    CURRENT.with(|state| {
        *state.blocked_on.lock() = Some(target);
        BlockedOn {
            state: Arc::clone(state),
        }
    })
}
