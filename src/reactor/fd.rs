use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::task::Waker;

/// The watch is registered and waiting for readiness.
const PENDING: u8 = 0;

/// The multiplexer reported readiness.
const FIRED: u8 = 1;

/// Registration or the descriptor itself failed.
const FAILED: u8 = 2;

/// Sentinel meaning the reactor has not assigned a token yet.
pub(crate) const NO_TOKEN: usize = usize::MAX;

/// State shared between a descriptor-wait future and the reactor.
///
/// The future registers its waker here and the reactor resolves the watch
/// through it, so waker re-registration on later polls never has to go back
/// through the command channel.
pub(crate) struct FdShared {
    state: AtomicU8,

    /// Waker of the waiting task; refreshed on every poll.
    waker: Mutex<Option<Waker>>,

    /// Failure reported by the reactor, present iff the state is `FAILED`.
    error: Mutex<Option<io::Error>>,

    /// Slab token assigned by the reactor when the watch lands.
    token: AtomicUsize,

    /// Set when the waiting future is dropped; a cancelled watch is
    /// discarded instead of resolved.
    cancelled: AtomicBool,
}

impl FdShared {
    pub(crate) fn new(waker: Waker) -> Self {
        Self {
            state: AtomicU8::new(PENDING),
            waker: Mutex::new(Some(waker)),
            error: Mutex::new(None),
            token: AtomicUsize::new(NO_TOKEN),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Resolves the watch as ready and wakes the waiter.
    pub(crate) fn fire(&self) {
        self.state.store(FIRED, Ordering::Release);

        if let Some(waker) = self.waker.lock().unwrap().take() {
            waker.wake();
        }
    }

    /// Resolves the watch as failed and wakes the waiter.
    pub(crate) fn fail(&self, error: io::Error) {
        *self.error.lock().unwrap() = Some(error);
        self.state.store(FAILED, Ordering::Release);

        if let Some(waker) = self.waker.lock().unwrap().take() {
            waker.wake();
        }
    }

    /// Re-registers the waiter's waker and reports whether the watch has
    /// resolved.
    ///
    /// Registers before the final state read, so a resolution racing this
    /// call is either observed here or wakes the fresh waker.
    pub(crate) fn poll_resolved(&self, waker: &Waker) -> Option<io::Result<()>> {
        match self.state.load(Ordering::Acquire) {
            PENDING => {}
            state => return Some(self.outcome(state)),
        }

        *self.waker.lock().unwrap() = Some(waker.clone());

        match self.state.load(Ordering::Acquire) {
            PENDING => None,
            state => Some(self.outcome(state)),
        }
    }

    fn outcome(&self, state: u8) -> io::Result<()> {
        if state == FAILED {
            Err(self
                .error
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| io::Error::from(io::ErrorKind::Other)))
        } else {
            Ok(())
        }
    }

    pub(crate) fn set_token(&self, token: usize) {
        self.token.store(token, Ordering::Release);
    }

    pub(crate) fn token(&self) -> usize {
        self.token.load(Ordering::Acquire)
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
