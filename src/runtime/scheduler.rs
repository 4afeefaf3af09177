use crate::runtime::task::Schedulable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// Shared handle to a run queue.
pub(crate) type SchedulerHandle = Arc<Scheduler>;

/// The run queue of a single cooperative execution context.
///
/// Tasks never preempt each other: the executor thread pops one task at a
/// time and polls it to its next suspension point. Wakes from any thread
/// (the reactor, an event setter, a joinable bridge) push the task back and
/// rouse the executor if it is parked.
pub(crate) struct Scheduler {
    /// Queued tasks, in wake order.
    queue: Mutex<VecDeque<Arc<dyn Schedulable>>>,

    /// Rouses the executor when work arrives.
    available: Condvar,

    /// Indicates that the runtime is shutting down.
    shutdown: AtomicBool,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Pushes a task onto the run queue and wakes the executor.
    pub(crate) fn schedule(&self, task: Arc<dyn Schedulable>) {
        self.queue.lock().unwrap().push_back(task);
        self.available.notify_one();
    }

    /// Signals shutdown and wakes the executor so it can exit.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.available.notify_all();
    }

    /// Blocks until a task is available, returning `None` on shutdown.
    pub(crate) fn next(&self) -> Option<Arc<dyn Schedulable>> {
        let mut queue = self.queue.lock().unwrap();

        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }

            if let Some(task) = queue.pop_front() {
                return Some(task);
            }

            queue = self.available.wait(queue).unwrap();
        }
    }
}
