//! Cancellable deadline.
//!
//! A single owned deadline that can be re-armed and cancelled. Re-arming
//! replaces the pending deadline, so at most one is ever scheduled.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// An owned, cancellable deadline.
///
/// `arm` schedules an expiry action after a duration, implicitly cancelling
/// any previously pending deadline; `cancel` discards the pending one. The
/// at-most-one-pending invariant holds by construction: the pending task
/// lives in a single slot, and replacing the slot aborts its predecessor.
#[derive(Default)]
pub struct Deadline {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `on_expire` to run after `after`, cancelling any pending
    /// deadline first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&self, after: Duration, on_expire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_expire.await;
        });

        let previous = self.pending.lock().unwrap().replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancels the pending deadline, if any. Safe to call repeatedly.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().unwrap().take() {
            task.abort();
        }
    }

    /// Returns true while a deadline is scheduled and has not yet expired.
    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.cancel();
    }
}
