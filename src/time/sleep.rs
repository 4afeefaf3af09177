use crate::reactor::command::Command;
use crate::runtime::context::CURRENT_REACTOR;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// The returned future registers a timer with the current runtime's reactor
/// and completes once the duration has elapsed.
///
/// # Panics
///
/// Panics if polled outside of a running runtime.
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// A future that completes once a specific deadline is reached.
///
/// The timer is registered with the reactor on first poll and cancelled if
/// the future is dropped before completion, so an abandoned sleep never
/// wakes its task.
pub struct Sleep {
    /// Absolute point in time when the sleep completes.
    deadline: Instant,

    /// Whether the timer has been registered with the reactor.
    registered: bool,

    /// Cancellation flag shared with the reactor.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + duration,
            registered: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if Instant::now() >= this.deadline {
            return Poll::Ready(());
        }

        if !this.registered {
            this.registered = true;

            CURRENT_REACTOR.with(|cell| {
                let binding = cell.borrow();
                let reactor = binding.as_ref().expect("sleep polled outside of runtime");

                let _ = reactor.send(Command::SetTimer {
                    deadline: this.deadline,
                    waker: cx.waker().clone(),
                    cancelled: this.cancelled.clone(),
                });
            });
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
