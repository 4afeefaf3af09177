use super::core::Runtime;
use crate::reactor::Multiplexer;

/// Builder for configuring and creating a [`Runtime`].
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new().build();
///
/// runtime.block_on(async {
///     // async code
/// });
/// ```
pub struct RuntimeBuilder {
    /// External descriptor multiplexer, if the embedder provides one.
    multiplexer: Option<Box<dyn Multiplexer>>,
}

impl RuntimeBuilder {
    /// Creates a builder with the default configuration: no multiplexer,
    /// one executor thread.
    pub fn new() -> Self {
        Self { multiplexer: None }
    }

    /// Installs the external descriptor multiplexer.
    ///
    /// The runtime registers descriptor interest with the multiplexer and
    /// expects readiness back through
    /// [`ReactorHandle::notify_fd`](crate::reactor::ReactorHandle::notify_fd).
    /// Without one, descriptor waits fail with `Unsupported`; timers work
    /// either way.
    pub fn multiplexer(mut self, multiplexer: impl Multiplexer) -> Self {
        self.multiplexer = Some(Box::new(multiplexer));
        self
    }

    /// Builds the runtime, starting its executor and reactor threads.
    pub fn build(self) -> Runtime {
        Runtime::new(self.multiplexer)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
