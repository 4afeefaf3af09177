//! Error types surfaced by the runtime.

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// The deadline of a [`timeout`](crate::time::timeout) elapsed before the
/// wrapped future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline elapsed before the future completed")]
pub struct Elapsed;

/// A joinable task body panicked instead of reaching its return point.
///
/// The panic payload is preserved and can be recovered with
/// [`into_panic`](JoinError::into_panic), mirroring what
/// `std::thread::JoinHandle::join` reports.
#[derive(Error)]
#[error("joinable task panicked")]
pub struct JoinError {
    payload: Box<dyn Any + Send + 'static>,
}

impl JoinError {
    pub(crate) fn panicked(payload: Box<dyn Any + Send + 'static>) -> Self {
        Self { payload }
    }

    /// Consumes the error, returning the panic payload of the task body.
    pub fn into_panic(self) -> Box<dyn Any + Send + 'static> {
        self.payload
    }
}

impl fmt::Debug for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JoinError::Panicked(..)")
    }
}
