use super::handle::TaskHandle;
use super::promise::{Promise, TaskOutput};
use super::state::{COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use super::waker::{Wakeable, make_waker};
use crate::runtime::context::CURRENT_SCHEDULER;
use crate::runtime::scheduler::SchedulerHandle;

use std::cell::UnsafeCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

/// A schedulable unit of work.
///
/// Erases the output type of a task so the scheduler can hold a
/// heterogeneous run queue of `Arc<dyn Schedulable>`.
pub(crate) trait Schedulable: Send + Sync {
    /// Polls the task once. Called by the executor.
    fn run(self: Arc<Self>);
}

/// A spawned asynchronous task.
///
/// A `Task` owns the body ("frame") for its lifetime and coordinates its
/// execution state, re-scheduling, and completion. The frame is dropped
/// exactly once: by the completion path when the body finishes, or with the
/// task allocation if the runtime shuts down before that.
pub(crate) struct Task<T> {
    /// The body. `None` once the task has completed.
    ///
    /// Wrapped in `UnsafeCell` for interior mutability during polls; the
    /// `RUNNING` state guarantees exclusive access.
    future: UnsafeCell<Option<Pin<Box<dyn Future<Output = T> + Send>>>>,

    /// Completion block shared with the task's handle.
    pub(crate) promise: Promise<T>,

    /// Scheduler lifecycle state (IDLE, QUEUED, RUNNING, ...).
    state: AtomicUsize,

    /// Run queue this task re-schedules itself onto when woken.
    scheduler: SchedulerHandle,
}

// Safety: the future slot is only accessed by the context holding the
// RUNNING state (or by the completion path it leads into); everything else
// is atomics or the internally synchronized promise.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    pub(crate) fn new<F>(future: F, scheduler: SchedulerHandle) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Some(Box::pin(future))),
            promise: Promise::new(),
            state: AtomicUsize::new(QUEUED),
            scheduler,
        }
    }

    /// Polls the task once.
    ///
    /// Transitions to `RUNNING`, polls the body, and handles the result:
    /// - `Poll::Pending`: back to `IDLE`, or re-queued if a wake arrived
    ///   while running (`NOTIFIED`),
    /// - `Poll::Ready` or a panic: the completion path (see [`finish`](Self::finish)).
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        // Transition to RUNNING. This grants exclusive access to the frame.
        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        let poll = {
            // Safety: the RUNNING state guarantees no other context touches
            // the frame.
            let slot = unsafe { &mut *self.future.get() };
            let Some(future) = slot.as_mut() else {
                return;
            };

            panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)))
        };

        match poll {
            Ok(Poll::Pending) => {
                // Return to IDLE unless a wake-up landed during the poll.
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    self.state.store(QUEUED, Ordering::Release);
                    self.scheduler.schedule(self.clone());
                }
            }
            Ok(Poll::Ready(value)) => self.finish(Ok(value)),
            Err(payload) => self.finish(Err(payload)),
        }
    }

    /// The completion path: drops the frame, publishes the output, and
    /// performs the continuation handoff.
    ///
    /// Exactly one of {this path, the handle's install} resumes the awaiter,
    /// whichever observes the other's transition; the handoff cell makes the
    /// arbitration lost-wakeup-proof.
    fn finish(&self, output: TaskOutput<T>) {
        // Safety: still on the RUNNING side; the frame borrow above ended.
        unsafe { (*self.future.get()).take() };

        self.promise.fulfill(output);
        self.state.store(COMPLETED, Ordering::Release);

        if let Some(waker) = self.promise.complete() {
            waker.wake();
        }
    }

    /// Signals the task to be polled again.
    ///
    /// `IDLE` tasks move to `QUEUED` and are pushed onto the run queue;
    /// `RUNNING` tasks move to `NOTIFIED` so they are re-queued right after
    /// the current poll. Completed or already-queued tasks ignore wakes.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.scheduler.schedule(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}

impl<T: Send + 'static> Schedulable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }
}

impl<T: Send + 'static> Wakeable for Task<T> {
    fn wake(self: Arc<Self>) {
        Task::wake(self)
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// The body starts eagerly: it runs on the calling context up to its first
/// suspension point before `spawn` returns, and continues on the runtime's
/// executor once woken. A body that never suspends is already complete when
/// the handle comes back.
///
/// A panic inside the body is caught, stored, and re-raised at the point
/// where the returned [`TaskHandle`] is awaited.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let scheduler = CURRENT_SCHEDULER.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    let task = Arc::new(Task::new(future, scheduler));

    // Eager start: poll once on the calling context.
    task.clone().run();

    TaskHandle { task }
}
