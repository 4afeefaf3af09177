//! Timers.
//!
//! Time-related futures that integrate with the runtime reactor:
//! [`sleep`] schedules a wake-up, [`timeout`] bounds how long another
//! future may take by racing it against a timer. Deadlines on descriptor
//! waits are layered out of the same race; see
//! [`fdio::fdwait`](crate::fdio::fdwait).

mod sleep;
mod timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Timeout, timeout};
