use std::future::Future;
use std::sync::Arc;
use std::thread;

use crate::reactor::command::Command;
use crate::reactor::{Multiplexer, Reactor, ReactorHandle};
use crate::runtime::context::enter_context;
use crate::runtime::scheduler::{Scheduler, SchedulerHandle};
use crate::runtime::task::{self, Schedulable, TaskHandle, joinable};

/// The main runtime handle.
///
/// A `Runtime` owns one cooperative execution context: a single executor
/// thread draining the run queue, plus a reactor thread for timers and
/// descriptor bookkeeping. Services that want one context per core create
/// one runtime per core.
///
/// Dropping the runtime shuts both threads down and joins them.
pub struct Runtime {
    /// Run queue shared with the executor thread.
    scheduler: SchedulerHandle,

    /// Handle to the reactor thread.
    reactor: ReactorHandle,

    /// The executor thread.
    executor: Option<thread::JoinHandle<()>>,

    /// The reactor thread.
    reactor_thread: Option<thread::JoinHandle<()>>,
}

impl Runtime {
    /// Creates a new runtime, starting its executor and reactor threads.
    pub(crate) fn new(multiplexer: Option<Box<dyn Multiplexer>>) -> Self {
        let (reactor, reactor_thread) = Reactor::start(multiplexer);
        let scheduler = Arc::new(Scheduler::new());

        let executor = {
            let scheduler = scheduler.clone();
            let reactor = reactor.clone();

            thread::Builder::new()
                .name("fibra-executor".into())
                .spawn(move || {
                    enter_context(Some(scheduler.clone()), Some(reactor), || {
                        while let Some(task) = scheduler.next() {
                            task.run();
                        }
                    });

                    log::trace!("executor thread stopped");
                })
                .expect("failed to spawn executor thread")
        };

        log::debug!("runtime started");

        Self {
            scheduler,
            reactor,
            executor: Some(executor),
            reactor_thread: Some(reactor_thread),
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// Like [`task::spawn`], the body starts eagerly on the calling thread
    /// up to its first suspension point.
    pub fn spawn<F, T>(&self, future: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        enter_context(
            Some(self.scheduler.clone()),
            Some(self.reactor.clone()),
            || task::spawn(future),
        )
    }

    /// Handle to this runtime's reactor.
    ///
    /// External multiplexers report descriptor readiness through it; see
    /// [`ReactorHandle::notify_fd`].
    pub fn reactor_handle(&self) -> ReactorHandle {
        self.reactor.clone()
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// The calling thread becomes the future's execution context: it is
    /// parked between polls and unparked by wakes, exactly like the
    /// joinable-task bridge, but without spawning a thread. This is the
    /// synchronous entry point of the runtime (in `main` or tests).
    ///
    /// Tasks spawned by the future run on the executor as usual.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        enter_context(
            Some(self.scheduler.clone()),
            Some(self.reactor.clone()),
            || joinable::drive(future),
        )
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// 1. Signals the scheduler so the executor exits its loop
    /// 2. Sends a shutdown command to the reactor
    /// 3. Joins both threads
    fn drop(&mut self) {
        self.scheduler.shutdown();
        let _ = self.reactor.send(Command::Shutdown);

        if let Some(executor) = self.executor.take() {
            let _ = executor.join();
        }
        if let Some(reactor) = self.reactor_thread.take() {
            let _ = reactor.join();
        }

        log::debug!("runtime stopped");
    }
}
