use super::core::Task;

use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// Awaiting the handle installs the awaiter as the task's continuation and
/// resolves once the body has completed. Whichever of {body completion,
/// continuation install} happens second performs the resume, so the awaiter
/// is resumed exactly once whether the body finished long ago or races the
/// install to the wire.
///
/// Dropping the handle does **not** stop the task; it only discards the
/// ability to observe its result. A panic in the task body is re-raised
/// here when the handle is awaited.
pub struct TaskHandle<T> {
    /// Shared reference to the underlying task.
    pub(crate) task: Arc<Task<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Whether the task body has completed.
    pub fn is_finished(&self) -> bool {
        self.task.promise.is_complete()
    }
}

impl<T: Send + 'static> Future for TaskHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if self.task.promise.install(cx.waker()) {
            return match self.task.promise.take_output() {
                Ok(value) => Poll::Ready(value),
                Err(payload) => panic::resume_unwind(payload),
            };
        }

        Poll::Pending
    }
}
