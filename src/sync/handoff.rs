use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::task::Waker;

/// No continuation has been installed yet.
const EMPTY: u8 = 0;

/// The consumer is writing a waker into the slot.
const STORING: u8 = 1;

/// A waker is published in the slot and may be taken by `complete`.
const STORED: u8 = 2;

/// The producer finished; the slot will never be read by it again.
const COMPLETE: u8 = 3;

/// A single-producer single-consumer one-shot continuation cell.
///
/// `Handoff` arbitrates the race between a task finishing and its awaiter
/// installing a continuation. Exactly one of the two parties ends up
/// responsible for the resume, in every interleaving:
///
/// - the producer calls [`complete`](Self::complete) once; if a waker was
///   fully published it is returned and the producer wakes it,
/// - the consumer calls [`install`](Self::install) on every poll; a `true`
///   return means completion already happened (or raced in mid-install) and
///   the consumer must resume inline instead of suspending.
///
/// Unlike a plain flag-plus-slot pair, the intermediate `STORING` state makes
/// waker re-registration on later polls safe: a producer that observes a
/// half-written slot leaves it alone and lets the consumer discover the
/// completion through its failed publish.
pub(crate) struct Handoff {
    state: AtomicU8,
    slot: UnsafeCell<Option<Waker>>,
}

// Safety: the slot is only touched by the consumer while it holds the
// STORING state, and by the producer only after observing STORED, which the
// consumer published with release ordering.
unsafe impl Send for Handoff {}
unsafe impl Sync for Handoff {}

impl Handoff {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            slot: UnsafeCell::new(None),
        }
    }

    /// Installs (or re-installs) the continuation waker. Consumer side.
    ///
    /// Returns `true` when the producer has already completed; the caller
    /// must not suspend but resume inline. Returns `false` when the waker is
    /// published and the producer is now responsible for waking it.
    pub(crate) fn install(&self, waker: &Waker) -> bool {
        loop {
            match self.state.load(Ordering::Acquire) {
                COMPLETE => return true,

                current @ (EMPTY | STORED) => {
                    if self
                        .state
                        .compare_exchange(
                            current,
                            STORING,
                            Ordering::Acquire,
                            Ordering::Acquire,
                        )
                        .is_err()
                    {
                        continue;
                    }

                    // Exclusive slot access while in STORING.
                    unsafe { *self.slot.get() = Some(waker.clone()) };

                    match self.state.compare_exchange(
                        STORING,
                        STORED,
                        Ordering::Release,
                        Ordering::Acquire,
                    ) {
                        Ok(_) => return false,
                        Err(_) => {
                            // Completion raced in while the slot was being
                            // written. The producer saw STORING and did not
                            // touch the slot, so the resume falls to us.
                            unsafe { *self.slot.get() = None };
                            return true;
                        }
                    }
                }

                // STORING with a single consumer can only be a stale read
                // between our own transitions; retry.
                _ => std::hint::spin_loop(),
            }
        }
    }

    /// Marks the handoff complete. Producer side, called at most once.
    ///
    /// Returns the published waker when the consumer suspended; the caller
    /// wakes it. Returns `None` when no continuation was installed (or one is
    /// mid-install, in which case the consumer resumes itself).
    pub(crate) fn complete(&self) -> Option<Waker> {
        match self.state.swap(COMPLETE, Ordering::AcqRel) {
            STORED => unsafe { (*self.slot.get()).take() },
            _ => None,
        }
    }

    /// Whether `complete` has been called.
    pub(crate) fn is_complete(&self) -> bool {
        self.state.load(Ordering::Acquire) == COMPLETE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{RawWaker, RawWakerVTable, Waker};
    use std::thread;

    fn counting_waker(count: Arc<AtomicUsize>) -> Waker {
        fn raw(count: *const ()) -> RawWaker {
            RawWaker::new(count, &VTABLE)
        }

        unsafe fn clone(data: *const ()) -> RawWaker {
            unsafe { Arc::increment_strong_count(data as *const AtomicUsize) };
            raw(data)
        }

        unsafe fn wake(data: *const ()) {
            let count = unsafe { Arc::from_raw(data as *const AtomicUsize) };
            count.fetch_add(1, Ordering::SeqCst);
        }

        unsafe fn wake_by_ref(data: *const ()) {
            let count = unsafe { &*(data as *const AtomicUsize) };
            count.fetch_add(1, Ordering::SeqCst);
        }

        unsafe fn drop_raw(data: *const ()) {
            drop(unsafe { Arc::from_raw(data as *const AtomicUsize) });
        }

        static VTABLE: RawWakerVTable =
            RawWakerVTable::new(clone, wake, wake_by_ref, drop_raw);

        unsafe { Waker::from_raw(raw(Arc::into_raw(count) as *const ())) }
    }

    #[test]
    fn install_after_complete_resumes_inline() {
        let handoff = Handoff::new();
        let count = Arc::new(AtomicUsize::new(0));

        assert!(handoff.complete().is_none());
        assert!(handoff.install(&counting_waker(count.clone())));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn complete_after_install_wakes_once() {
        let handoff = Handoff::new();
        let count = Arc::new(AtomicUsize::new(0));

        assert!(!handoff.install(&counting_waker(count.clone())));
        handoff.complete().expect("waker was published").wake();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reinstall_replaces_the_waker() {
        let handoff = Handoff::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        assert!(!handoff.install(&counting_waker(first.clone())));
        assert!(!handoff.install(&counting_waker(second.clone())));

        handoff.complete().expect("waker was published").wake();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    // The single-resume property: whichever side wins the race, the
    // continuation is resumed exactly once.
    #[test]
    fn racing_install_and_complete_resume_exactly_once() {
        for _ in 0..2000 {
            let handoff = Arc::new(Handoff::new());
            let count = Arc::new(AtomicUsize::new(0));

            let producer = {
                let handoff = handoff.clone();
                thread::spawn(move || {
                    if let Some(waker) = handoff.complete() {
                        waker.wake();
                    }
                })
            };

            let consumer = {
                let handoff = handoff.clone();
                let count = count.clone();
                thread::spawn(move || {
                    let waker = counting_waker(count.clone());
                    if handoff.install(&waker) {
                        // Inline resume path.
                        count.fetch_add(1, Ordering::SeqCst);
                    }
                })
            };

            producer.join().unwrap();
            consumer.join().unwrap();

            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }
}
