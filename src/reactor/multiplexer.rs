use std::io;

/// Platform descriptor type watched by the multiplexer.
#[cfg(unix)]
pub type RawFd = std::os::fd::RawFd;

/// Platform descriptor type watched by the multiplexer.
#[cfg(windows)]
pub type RawFd = std::os::windows::io::RawSocket;

/// The readiness a descriptor wait is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    /// Wake when the descriptor becomes readable.
    pub read: bool,

    /// Wake when the descriptor becomes writable.
    pub write: bool,
}

impl Interest {
    /// Readable-only interest.
    pub const READ: Interest = Interest {
        read: true,
        write: false,
    };

    /// Writable-only interest.
    pub const WRITE: Interest = Interest {
        read: false,
        write: true,
    };
}

/// The external event multiplexer this runtime delegates descriptor polling
/// to.
///
/// The runtime never calls `epoll`, `kqueue`, or `poll` itself. Instead it
/// hands each watched descriptor to the installed `Multiplexer` (via
/// [`RuntimeBuilder::multiplexer`](crate::RuntimeBuilder::multiplexer)) and
/// expects readiness to be reported back through
/// [`ReactorHandle::notify_fd`](super::ReactorHandle::notify_fd) with the
/// same token. A watch is one-shot: once readiness for it has been
/// reported, or [`remove`](Self::remove) is called, the multiplexer must
/// stop watching that registration.
///
/// The multiplexer runs on its own thread(s), owned by the embedder.
pub trait Multiplexer: Send + 'static {
    /// Starts watching `fd` for `interest`, tagged with `token`.
    fn add(&mut self, fd: RawFd, token: usize, interest: Interest) -> io::Result<()>;

    /// Stops watching the registration tagged with `token`.
    fn remove(&mut self, fd: RawFd, token: usize) -> io::Result<()>;
}
