use crate::sync::Handoff;

use std::any::Any;
use std::cell::UnsafeCell;
use std::task::Waker;

/// What a task body produced: its value, or the payload of its panic.
pub(crate) type TaskOutput<T> = Result<T, Box<dyn Any + Send + 'static>>;

/// The completion block of a task.
///
/// Lives inside the task allocation, never on its own. It pairs the output
/// slot with the one-shot continuation cell that arbitrates the race between
/// the body finishing and an awaiter installing itself.
pub(crate) struct Promise<T> {
    /// Written exactly once, by the completion path, before the handoff
    /// transitions to complete.
    output: UnsafeCell<Option<TaskOutput<T>>>,

    continuation: Handoff,
}

// Safety: the output slot is written only by the completing side before the
// handoff's release transition, and read only by the single awaiter after
// its acquire observation of that transition.
unsafe impl<T: Send> Send for Promise<T> {}
unsafe impl<T: Send> Sync for Promise<T> {}

impl<T> Promise<T> {
    pub(crate) const fn new() -> Self {
        Self {
            output: UnsafeCell::new(None),
            continuation: Handoff::new(),
        }
    }

    /// Stores the body's output. Completion side, called exactly once and
    /// always before [`complete`](Self::complete).
    pub(crate) fn fulfill(&self, output: TaskOutput<T>) {
        unsafe { *self.output.get() = Some(output) };
    }

    /// Finishes the handoff, returning the continuation waker when one was
    /// installed.
    pub(crate) fn complete(&self) -> Option<Waker> {
        self.continuation.complete()
    }

    /// Installs the awaiter. Returns `true` when the task already completed
    /// and the awaiter must consume the output inline.
    pub(crate) fn install(&self, waker: &Waker) -> bool {
        self.continuation.install(waker)
    }

    /// Takes the output. Only valid after [`install`](Self::install)
    /// returned `true`.
    pub(crate) fn take_output(&self) -> TaskOutput<T> {
        unsafe {
            (*self.output.get())
                .take()
                .expect("task output already consumed")
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.continuation.is_complete()
    }
}
