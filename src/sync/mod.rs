//! Synchronization primitives.
//!
//! Two awaitable events cover the wait/notify patterns of the runtime:
//!
//! - [`AutoResetEvent`] releases exactly one waiter per `set()` and stays
//!   primed when nobody is waiting,
//! - [`ManualResetEvent`] broadcasts to every waiter until explicitly reset.
//!
//! [`Mutex`] is an async mutual-exclusion lock built on the same
//! suspend-and-wake protocol. None of these primitives block the executor
//! thread; waiting tasks are suspended and woken by whoever signals.

mod auto_reset;
mod handoff;
mod manual_reset;
mod mutex;

pub(crate) use handoff::Handoff;

pub use auto_reset::{AutoResetEvent, AutoResetWait};
pub use manual_reset::{ManualResetEvent, ManualResetWait};
pub use mutex::{LockFuture, Mutex, MutexGuard};
