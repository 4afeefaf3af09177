use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// The waiter is queued and may be claimed by `set`.
const WAITING: u8 = 0;

/// A `set` call claimed this waiter; it owns one released signal.
const NOTIFIED: u8 = 1;

/// The wait future was dropped before being released; skip this node.
const ABANDONED: u8 = 2;

/// One queued waiter.
///
/// The node is shared between the suspended wait future and the event queue,
/// so either side may outlive the other; whichever observes the other's state
/// transition decides between resuming and discarding.
struct WaitNode {
    state: AtomicU8,
    waker: Mutex<Option<Waker>>,
}

struct Inner {
    /// Unconsumed `set` signals. Each one lets a single wait through.
    signals: usize,
    waiters: VecDeque<Arc<WaitNode>>,
}

/// An event that releases exactly one waiter per [`set`](Self::set) call.
///
/// When nobody is waiting, `set` leaves the event primed: the signal is
/// remembered and the next [`wait`](Self::wait) completes without suspending.
/// Signals accumulate, so `n` sets with `m < n` suspended waiters release all
/// `m` and keep `n - m` signals for future waits.
///
/// Events are long-lived and may be awaited any number of times; share them
/// between tasks with `Arc` or by reference.
pub struct AutoResetEvent {
    inner: Mutex<Inner>,
}

impl AutoResetEvent {
    /// Creates an event, optionally starting with one primed signal.
    pub fn new(initially_set: bool) -> Self {
        Self {
            inner: Mutex::new(Inner {
                signals: usize::from(initially_set),
                waiters: VecDeque::new(),
            }),
        }
    }

    /// Releases one suspended waiter, or primes the event when none is queued.
    pub fn set(&self) {
        let mut inner = self.inner.lock().unwrap();

        while let Some(node) = inner.waiters.pop_front() {
            if node
                .state
                .compare_exchange(WAITING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                drop(inner);

                if let Some(waker) = node.waker.lock().unwrap().take() {
                    waker.wake();
                }
                return;
            }
            // Abandoned waiter: discard the node and release the next one.
        }

        inner.signals += 1;
    }

    /// Clears any primed signals. Queued waiters are unaffected.
    pub fn reset(&self) {
        self.inner.lock().unwrap().signals = 0;
    }

    /// Waits until a signal is available, consuming it.
    pub fn wait(&self) -> AutoResetWait<'_> {
        AutoResetWait {
            event: self,
            node: None,
            done: false,
        }
    }
}

/// Future returned by [`AutoResetEvent::wait`].
pub struct AutoResetWait<'a> {
    event: &'a AutoResetEvent,
    node: Option<Arc<WaitNode>>,
    done: bool,
}

impl Future for AutoResetWait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.done {
            return Poll::Ready(());
        }

        if let Some(node) = &this.node {
            if node.state.load(Ordering::Acquire) == NOTIFIED {
                this.done = true;
                this.node = None;
                return Poll::Ready(());
            }

            *node.waker.lock().unwrap() = Some(cx.waker().clone());

            // A `set` may have claimed the node between the state check and
            // the waker store; it would have found the slot empty or stale,
            // so the release must be observed here instead.
            if node.state.load(Ordering::Acquire) == NOTIFIED {
                this.done = true;
                this.node = None;
                return Poll::Ready(());
            }

            return Poll::Pending;
        }

        let mut inner = this.event.inner.lock().unwrap();

        if inner.signals > 0 {
            inner.signals -= 1;
            this.done = true;
            return Poll::Ready(());
        }

        let node = Arc::new(WaitNode {
            state: AtomicU8::new(WAITING),
            waker: Mutex::new(Some(cx.waker().clone())),
        });
        inner.waiters.push_back(node.clone());
        this.node = Some(node);

        Poll::Pending
    }
}

impl Drop for AutoResetWait<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }

        let Some(node) = self.node.take() else {
            return;
        };

        if node
            .state
            .compare_exchange(WAITING, ABANDONED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // A `set` already claimed this waiter, but the signal will never
            // be consumed here; pass it on so it is not lost.
            self.event.set();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::task::{RawWaker, RawWakerVTable, Waker};

    fn noop_waker() -> Waker {
        fn raw() -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        unsafe fn clone(_: *const ()) -> RawWaker {
            raw()
        }
        unsafe fn noop(_: *const ()) {}

        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

        unsafe { Waker::from_raw(raw()) }
    }

    fn poll_once(wait: &mut AutoResetWait<'_>) -> Poll<()> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        Pin::new(wait).poll(&mut cx)
    }

    #[test]
    fn initially_set_completes_without_suspending() {
        let event = AutoResetEvent::new(true);
        let mut wait = event.wait();

        assert_eq!(poll_once(&mut wait), Poll::Ready(()));
    }

    #[test]
    fn signals_accumulate_and_reset_clears_them() {
        let event = AutoResetEvent::new(false);
        event.set();
        event.set();

        assert_eq!(poll_once(&mut event.wait()), Poll::Ready(()));
        assert_eq!(poll_once(&mut event.wait()), Poll::Ready(()));
        assert_eq!(poll_once(&mut event.wait()), Poll::Pending);

        event.set();
        event.reset();
        assert_eq!(poll_once(&mut event.wait()), Poll::Pending);
    }

    #[test]
    fn one_set_releases_exactly_one_of_two_waiters() {
        let event = AutoResetEvent::new(false);

        let mut first = event.wait();
        let mut second = event.wait();
        assert_eq!(poll_once(&mut first), Poll::Pending);
        assert_eq!(poll_once(&mut second), Poll::Pending);

        event.set();

        let released = [poll_once(&mut first), poll_once(&mut second)]
            .iter()
            .filter(|p| **p == Poll::Ready(()))
            .count();
        assert_eq!(released, 1);
    }

    #[test]
    fn dropping_a_claimed_waiter_forwards_the_signal() {
        let event = AutoResetEvent::new(false);

        let mut abandoned = event.wait();
        assert_eq!(poll_once(&mut abandoned), Poll::Pending);

        let mut survivor = event.wait();
        assert_eq!(poll_once(&mut survivor), Poll::Pending);

        // Claims `abandoned`, which is then dropped without consuming it.
        event.set();
        drop(abandoned);

        assert_eq!(poll_once(&mut survivor), Poll::Ready(()));
    }

    #[test]
    fn dropping_an_unclaimed_waiter_is_skipped_by_set() {
        let event = AutoResetEvent::new(false);

        let mut abandoned = event.wait();
        assert_eq!(poll_once(&mut abandoned), Poll::Pending);
        drop(abandoned);

        let mut survivor = event.wait();
        assert_eq!(poll_once(&mut survivor), Poll::Pending);

        event.set();
        assert_eq!(poll_once(&mut survivor), Poll::Ready(()));
    }
}
