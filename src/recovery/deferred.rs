//! Fixed-delay actions tied to the lifetime of their owner.
//!
//! A [`Deferred`] wraps a spawned `tokio` task. Dropping it aborts the task, so a
//! step that goes away takes its pending transition with it.

use std::{future::Future, time::Duration};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle, time::sleep};
use tracing::debug;

#[derive(Debug)]
pub struct Deferred {
    handle: JoinHandle<()>,
}

impl Deferred {
    /// Runs `action` after `delay` unless the guard is dropped first.
    ///
    /// Must be called from within a `tokio` runtime.
    pub fn schedule<F>(delay: Duration, action: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            action.await;
        });

        Self { handle }
    }

    /// Sends `event` on `sender` after `delay`. A closed channel is ignored.
    pub fn send_after<T>(delay: Duration, sender: UnboundedSender<T>, event: T) -> Self
    where
        T: Send + 'static,
    {
        Self::schedule(delay, async move {
            if sender.send(event).is_err() {
                debug!("deferred event dropped, receiver is gone");
            }
        })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
