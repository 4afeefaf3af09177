use crate::reactor::ReactorHandle;
use crate::runtime::scheduler::SchedulerHandle;

use std::cell::RefCell;

thread_local! {
    /// Thread-local handle to the current scheduler.
    ///
    /// Set when entering the runtime context; lets `spawn` and task wakes
    /// reach the run queue without explicit parameter passing.
    pub(crate) static CURRENT_SCHEDULER: RefCell<Option<SchedulerHandle>> =
        const { RefCell::new(None) };

    /// Thread-local handle to the current reactor.
    ///
    /// Lets timers and descriptor waits register themselves from anywhere
    /// inside the runtime context.
    pub(crate) static CURRENT_REACTOR: RefCell<Option<ReactorHandle>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the duration of `f`.
///
/// Installs the given handles into the thread-locals and restores the
/// previous context afterwards, so entering is reentrant. Joinable bridges
/// pass whatever subset of the context their spawning thread had.
pub(crate) fn enter_context<R>(
    scheduler: Option<SchedulerHandle>,
    reactor: Option<ReactorHandle>,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_SCHEDULER.with(|s| {
        CURRENT_REACTOR.with(|r| {
            let prev_scheduler = s.replace(scheduler);
            let prev_reactor = r.replace(reactor);

            let out = f();

            r.replace(prev_reactor);
            s.replace(prev_scheduler);

            out
        })
    })
}
