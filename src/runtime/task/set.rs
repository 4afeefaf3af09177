use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::Poll;

use crate::task;

/// A collection of spawned tasks awaited as a group.
///
/// `JoinSet` manages a dynamic number of tasks, draining them as they
/// finish. Typical uses are fan-out request handling and making sure a
/// batch of background tasks has fully completed before moving on.
///
/// Tasks keep running when the set is dropped; there is no cancellation.
pub struct JoinSet {
    /// Completion futures for the managed tasks, type-erased so one set can
    /// hold tasks with different outputs.
    handles: Vec<Pin<Box<dyn Future<Output = ()> + Send>>>,
}

impl JoinSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawns a task into the set.
    ///
    /// The task starts immediately, like [`task::spawn`]; its output is
    /// discarded when the set reaps it.
    pub fn spawn<F, T>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = task::spawn(future);
        self.handles.push(Box::pin(async move {
            let _ = handle.await;
        }));
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether every spawned task has been reaped.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for the next task to complete and removes it from the set.
    ///
    /// Returns `None` when the set is empty.
    pub async fn join_next(&mut self) -> Option<()> {
        if self.handles.is_empty() {
            return None;
        }

        poll_fn(|cx| {
            let mut i = 0;

            while i < self.handles.len() {
                match self.handles[i].as_mut().poll(cx) {
                    Poll::Ready(()) => {
                        // Order does not matter; O(1) removal.
                        self.handles.swap_remove(i);
                        return Poll::Ready(Some(()));
                    }
                    Poll::Pending => i += 1,
                }
            }

            Poll::Pending
        })
        .await
    }

    /// Waits for every task in the set to complete.
    pub async fn join_all(&mut self) {
        while self.join_next().await.is_some() {}
    }
}

impl Default for JoinSet {
    fn default() -> Self {
        Self::new()
    }
}
