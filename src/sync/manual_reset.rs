use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::task::{Context, Poll, Waker};

/// An event that, once set, releases every current and future waiter until
/// it is explicitly [`reset`](Self::reset).
///
/// [`set`](Self::set) is a broadcast: all waiters suspended at the moment of
/// the call are woken, and any wait that races with it observes the set flag
/// and completes without suspending. Setting an already-set event or
/// resetting an already-unset one is a no-op.
///
/// `reset` racing concurrent wait registrations is not arbitrated here; if
/// both can happen at once, the caller must order them externally.
pub struct ManualResetEvent {
    set: AtomicBool,
    waiters: Mutex<Vec<Waker>>,
}

impl ManualResetEvent {
    /// Creates an event in the given initial state.
    pub fn new(initially_set: bool) -> Self {
        Self {
            set: AtomicBool::new(initially_set),
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Non-blocking read of the current state.
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    /// Sets the event and wakes every registered waiter.
    pub fn set(&self) {
        self.set.store(true, Ordering::Release);

        let waiters = std::mem::take(&mut *self.waiters.lock().unwrap());
        for waker in waiters {
            waker.wake();
        }
    }

    /// Returns the event to the unset state.
    pub fn reset(&self) {
        self.set.store(false, Ordering::Release);
    }

    /// Waits until the event is set.
    pub fn wait(&self) -> ManualResetWait<'_> {
        ManualResetWait { event: self }
    }
}

/// Future returned by [`ManualResetEvent::wait`].
pub struct ManualResetWait<'a> {
    event: &'a ManualResetEvent,
}

impl Future for ManualResetWait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.event.is_set() {
            return Poll::Ready(());
        }

        self.event.waiters.lock().unwrap().push(cx.waker().clone());

        // A `set` that drained the list before the push above stored the flag
        // first, so it is visible here; one that drains after the push wakes
        // the registered waker. Either way the wakeup cannot be lost.
        if self.event.is_set() {
            return Poll::Ready(());
        }

        Poll::Pending
    }
}
