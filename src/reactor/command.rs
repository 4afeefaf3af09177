use super::fd::FdShared;
use super::multiplexer::{Interest, RawFd};

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// Requests processed by the reactor thread.
pub(crate) enum Command {
    /// Start watching a descriptor for readiness.
    Watch {
        fd: RawFd,
        interest: Interest,
        shared: Arc<FdShared>,
    },

    /// Withdraw a watch whose future was dropped.
    Unwatch { fd: RawFd, token: usize },

    /// Readiness (or failure) reported by the external multiplexer.
    FdEvent {
        token: usize,
        readable: bool,
        writable: bool,
        is_error: bool,
    },

    /// Schedule a wake-up at `deadline`.
    SetTimer {
        deadline: Instant,
        waker: Waker,
        cancelled: Arc<AtomicBool>,
    },

    /// Stop the reactor thread.
    Shutdown,
}
