//! Reactor: timers and the multiplexer boundary.
//!
//! The reactor thread owns the timer queue and the table of watched
//! descriptors. It does **not** poll descriptors itself; that is delegated
//! to an external [`Multiplexer`] installed by the embedder, which reports
//! readiness back through [`ReactorHandle::notify_fd`].
//!
//! Runtime users interact with the reactor indirectly, through
//! [`time`](crate::time) and [`fdio`](crate::fdio); embedders implement
//! [`Multiplexer`] to bring their own event-polling backend.

mod timer;

pub(crate) mod command;
pub(crate) mod fd;

mod core;
mod multiplexer;

pub(crate) use self::core::Reactor;

pub use self::core::ReactorHandle;
pub use multiplexer::{Interest, Multiplexer, RawFd};
