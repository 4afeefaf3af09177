//! # Fibra
//!
//! **Fibra** is a lightweight async runtime built around a single cooperative
//! execution context per core. Instead of a work-stealing thread pool, each
//! [`Runtime`] drives its tasks on one executor thread; services that want
//! to use every core run one runtime per core.
//!
//! The runtime provides:
//!
//! - **Tasks** with eager start: a spawned body runs on the calling context up
//!   to its first suspension point, then continues on the executor.
//! - **Awaitable events** — [`AutoResetEvent`](sync::AutoResetEvent) releases
//!   exactly one waiter per `set()`, [`ManualResetEvent`](sync::ManualResetEvent)
//!   broadcasts to all waiters until reset.
//! - **A blocking-join bridge** — [`task::spawn_joinable`] runs a task body on
//!   a dedicated OS thread so plain (non-async) code can drive it to
//!   completion with a blocking [`join`](task::JoinableTask::join).
//! - **Timers and descriptor waits** — [`time::sleep`], [`time::timeout`], and
//!   [`fdio::fdwait`], with descriptor readiness delegated to an external
//!   [`Multiplexer`](reactor::Multiplexer).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fibra::RuntimeBuilder;
//! use fibra::task;
//!
//! let rt = RuntimeBuilder::new().build();
//!
//! let total = rt.block_on(async {
//!     let handle = task::spawn(async { 21 });
//!     handle.await * 2
//! });
//!
//! assert_eq!(total, 42);
//! ```
//!
//! ## Modules
//!
//! - [`task`] — spawning, task handles, the joinable bridge
//! - [`sync`] — events, the async mutex
//! - [`time`] — sleep and timeout
//! - [`fdio`] — descriptor-readiness waits
//! - [`reactor`] — the multiplexer interface for embedders

mod macros;
mod runtime;
mod utils;

pub mod error;
#[cfg(unix)]
pub mod fdio;
pub mod reactor;
pub mod sync;
pub mod time;

pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;
