use super::waker::{Wakeable, make_waker};
use crate::error::JoinError;
use crate::runtime::context::{CURRENT_REACTOR, CURRENT_SCHEDULER, enter_context};

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::task::{Context, Poll};
use std::thread::{self, Thread};

/// A task driven to completion on a dedicated OS thread.
///
/// This is the sanctioned crossing point between the cooperative world and
/// real threads: the body runs on its own thread, and a plain (non-async)
/// caller blocks in [`join`](Self::join) until it finishes. A joinable task
/// is deliberately **not** a [`Future`]: it is joined, never awaited.
///
/// Dropping the task without joining detaches the thread; the body keeps
/// running but its result is lost.
pub struct JoinableTask<T> {
    receiver: Receiver<thread::Result<T>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl<T> JoinableTask<T> {
    /// Blocks the calling thread until the task body reaches its return
    /// point, then reaps the thread.
    ///
    /// Calling `join` before the body has even started still blocks
    /// correctly. A panicking body surfaces as [`JoinError`]; the payload
    /// can be recovered from it.
    pub fn join(mut self) -> Result<T, JoinError> {
        let output = self.receiver.recv();

        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }

        match output {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(JoinError::panicked(payload)),
            // The sender is dropped without sending only if the thread died
            // in a way `catch_unwind` cannot observe.
            Err(_) => Err(JoinError::panicked(Box::new("joinable task thread terminated"))),
        }
    }
}

/// Spawns a future onto a freshly created OS thread and returns a handle to
/// block on it.
///
/// The runtime context of the spawning thread (scheduler and reactor
/// handles, when present) is propagated to the new thread, so the body can
/// still use timers, descriptor waits, and [`spawn`](super::spawn).
///
/// # Panics
///
/// Panics if the OS refuses to spawn a thread.
pub fn spawn_joinable<F, T>(future: F) -> JoinableTask<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let scheduler = CURRENT_SCHEDULER.with(|cell| cell.borrow().clone());
    let reactor = CURRENT_REACTOR.with(|cell| cell.borrow().clone());

    let (transmitter, receiver) = mpsc::sync_channel(1);

    log::trace!("spawning joinable task thread");

    let thread = thread::Builder::new()
        .name("fibra-joinable".into())
        .spawn(move || {
            let output = panic::catch_unwind(AssertUnwindSafe(|| {
                enter_context(scheduler, reactor, || drive(future))
            }));
            let _ = transmitter.send(output);
        })
        .expect("failed to spawn joinable task thread");

    JoinableTask {
        receiver,
        thread: Some(thread),
    }
}

/// Runs a future to completion on the current thread.
///
/// The thread itself is the execution context: wakes from timers, events,
/// or other tasks unpark it, and it re-polls until the body returns. This
/// park/unpark pair is the binary semaphore of the thread bridge.
pub(crate) fn drive<F: Future>(future: F) -> F::Output {
    let parker = Arc::new(Parker {
        thread: thread::current(),
    });
    let waker = make_waker(parker);
    let mut cx = Context::from_waker(&waker);

    let mut future = pin!(future);

    loop {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(value) => return value,
            Poll::Pending => thread::park(),
        }
    }
}

/// Wakes the driving thread by unparking it.
struct Parker {
    thread: Thread,
}

impl Wakeable for Parker {
    fn wake(self: Arc<Self>) {
        self.thread.unpark();
    }
}
