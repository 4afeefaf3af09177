//! Descriptor-readiness waits.
//!
//! The glue between tasks and the external event multiplexer: [`fdwait`]
//! suspends the calling task until a descriptor is ready, a deadline
//! elapses, or the watch fails. The descriptor itself must already be in
//! non-blocking mode; [`set_nonblocking`] is the usual first step.
//!
//! These waits require a [`Multiplexer`](crate::reactor::Multiplexer) to be
//! installed on the runtime; without one they resolve with
//! `ErrorKind::Unsupported`.

use crate::error::Elapsed;
use crate::reactor::command::Command;
use crate::reactor::fd::FdShared;
use crate::runtime::context::CURRENT_REACTOR;
use crate::time;

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

pub use crate::reactor::{Interest, RawFd};

/// How a descriptor wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// The descriptor became ready for the requested interest.
    Fired,

    /// The deadline elapsed first; the watch was withdrawn.
    TimedOut,
}

/// Suspends the calling task until `fd` is ready, with an optional deadline.
///
/// Returns [`WaitStatus::Fired`] when the multiplexer reports readiness and
/// [`WaitStatus::TimedOut`] when the deadline elapses first. Descriptor
/// failures (`POLLERR`-class conditions, registration errors) surface as
/// `Err`.
pub async fn fdwait(
    fd: RawFd,
    interest: Interest,
    limit: Option<Duration>,
) -> io::Result<WaitStatus> {
    let ready = FdReady::new(fd, interest);

    match limit {
        None => {
            ready.await?;
            Ok(WaitStatus::Fired)
        }
        Some(limit) => match time::timeout(limit, ready).await {
            Ok(result) => {
                result?;
                Ok(WaitStatus::Fired)
            }
            Err(Elapsed) => Ok(WaitStatus::TimedOut),
        },
    }
}

/// A future that resolves when a descriptor becomes ready.
///
/// Registered with the reactor on first poll; dropping it (for example when
/// it loses a [`timeout`](crate::time::timeout) race) withdraws the watch.
pub struct FdReady {
    fd: RawFd,
    interest: Interest,
    shared: Option<Arc<FdShared>>,
    resolved: bool,
}

impl FdReady {
    /// Creates a readiness future for `fd`.
    pub fn new(fd: RawFd, interest: Interest) -> Self {
        Self {
            fd,
            interest,
            shared: None,
            resolved: false,
        }
    }
}

impl Future for FdReady {
    type Output = io::Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(shared) = &this.shared {
            return match shared.poll_resolved(cx.waker()) {
                Some(result) => {
                    this.resolved = true;
                    Poll::Ready(result)
                }
                None => Poll::Pending,
            };
        }

        // First poll: hand the watch to the reactor.
        let shared = Arc::new(FdShared::new(cx.waker().clone()));

        CURRENT_REACTOR.with(|cell| {
            let binding = cell.borrow();
            let reactor = binding.as_ref().expect("fdwait polled outside of runtime");

            let _ = reactor.send(Command::Watch {
                fd: this.fd,
                interest: this.interest,
                shared: shared.clone(),
            });
        });

        this.shared = Some(shared);
        Poll::Pending
    }
}

impl Drop for FdReady {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }

        let Some(shared) = self.shared.take() else {
            return;
        };

        shared.cancel();

        CURRENT_REACTOR.with(|cell| {
            if let Some(reactor) = cell.borrow().as_ref() {
                let _ = reactor.send(Command::Unwatch {
                    fd: self.fd,
                    token: shared.token(),
                });
            }
        });
    }
}

/// Puts a descriptor into non-blocking mode.
pub fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
