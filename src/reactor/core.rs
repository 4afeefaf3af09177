use super::command::Command;
use super::fd::{FdShared, NO_TOKEN};
use super::multiplexer::{Interest, Multiplexer, RawFd};
use super::timer::TimerEntry;
use crate::utils::Slab;

use std::collections::BinaryHeap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::thread;
use std::time::Instant;

/// Cloneable handle to the reactor thread.
#[derive(Clone)]
pub struct ReactorHandle {
    transmitter: Sender<Command>,
}

impl ReactorHandle {
    /// Sends a command to the reactor. Fails only after shutdown.
    pub(crate) fn send(&self, command: Command) -> Result<(), ()> {
        self.transmitter.send(command).map_err(|_| ())
    }

    /// Reports descriptor readiness into the runtime.
    ///
    /// Called by the external [`Multiplexer`]'s polling thread with the
    /// token the watch was registered under. `is_error` marks conditions
    /// such as `POLLERR`/`POLLHUP`; the corresponding wait resolves with an
    /// error instead of readiness.
    pub fn notify_fd(&self, token: usize, readable: bool, writable: bool, is_error: bool) {
        let _ = self.send(Command::FdEvent {
            token,
            readable,
            writable,
            is_error,
        });
    }
}

/// A watched descriptor registration.
struct Watch {
    fd: RawFd,
    interest: Interest,
    shared: Arc<FdShared>,
}

/// The reactor: timers plus descriptor-watch bookkeeping.
///
/// Runs on its own thread, processing commands from the runtime and
/// readiness notifications from the external multiplexer. It blocks in
/// `recv_timeout` until the next timer deadline; descriptor polling itself
/// is entirely the multiplexer's job.
pub(crate) struct Reactor {
    receiver: Receiver<Command>,

    timers: BinaryHeap<TimerEntry>,
    watches: Slab<Watch>,
    multiplexer: Option<Box<dyn Multiplexer>>,
}

impl Reactor {
    /// Starts the reactor thread.
    pub(crate) fn start(
        multiplexer: Option<Box<dyn Multiplexer>>,
    ) -> (ReactorHandle, thread::JoinHandle<()>) {
        let (transmitter, receiver) = channel();

        let reactor = Reactor {
            receiver,
            timers: BinaryHeap::new(),
            watches: Slab::with_capacity(64),
            multiplexer,
        };

        let thread = thread::Builder::new()
            .name("fibra-reactor".into())
            .spawn(move || reactor.run())
            .expect("failed to spawn reactor thread");

        (ReactorHandle { transmitter }, thread)
    }

    fn run(mut self) {
        log::trace!("reactor thread started");

        loop {
            // Drain whatever is immediately available.
            loop {
                match self.receiver.try_recv() {
                    Ok(command) => {
                        if self.handle(command) {
                            return;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            self.fire_due_timers();

            // Block until the next deadline or the next command.
            let command = match self.timers.peek() {
                Some(next) => {
                    let timeout = next.deadline.saturating_duration_since(Instant::now());

                    match self.receiver.recv_timeout(timeout) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
                None => match self.receiver.recv() {
                    Ok(command) => Some(command),
                    Err(_) => return,
                },
            };

            if let Some(command) = command {
                if self.handle(command) {
                    return;
                }
            }
        }
    }

    /// Processes one command; returns `true` on shutdown.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Watch {
                fd,
                interest,
                shared,
            } => self.watch(fd, interest, shared),

            Command::Unwatch { fd, token } => {
                if token == NO_TOKEN {
                    // The watch was dropped before this thread registered
                    // it; the cancelled flag makes the pending Watch a no-op.
                    return false;
                }

                if self.watches.try_remove(token).is_some() {
                    if let Some(multiplexer) = &mut self.multiplexer {
                        let _ = multiplexer.remove(fd, token);
                    }
                }
            }

            Command::FdEvent {
                token,
                readable,
                writable,
                is_error,
            } => self.fd_event(token, readable, writable, is_error),

            Command::SetTimer {
                deadline,
                waker,
                cancelled,
            } => {
                self.timers.push(TimerEntry {
                    deadline,
                    waker,
                    cancelled,
                });
            }

            Command::Shutdown => {
                log::trace!("reactor shutting down");
                return true;
            }
        }

        false
    }

    fn watch(&mut self, fd: RawFd, interest: Interest, shared: Arc<FdShared>) {
        if shared.is_cancelled() {
            return;
        }

        let Some(multiplexer) = &mut self.multiplexer else {
            shared.fail(io::Error::from(io::ErrorKind::Unsupported));
            return;
        };

        let token = self.watches.insert(Watch {
            fd,
            interest,
            shared: shared.clone(),
        });
        shared.set_token(token);

        if let Err(error) = multiplexer.add(fd, token, interest) {
            log::warn!("multiplexer rejected descriptor {fd:?}: {error}");
            self.watches.try_remove(token);
            shared.fail(error);
        }
    }

    fn fd_event(&mut self, token: usize, readable: bool, writable: bool, is_error: bool) {
        let relevant = match self.watches.get(token) {
            Some(watch) => {
                is_error
                    || (readable && watch.interest.read)
                    || (writable && watch.interest.write)
            }
            // Stale token: the watch was withdrawn before the notification
            // arrived.
            None => false,
        };

        if !relevant {
            return;
        }

        let watch = self.watches.try_remove(token).unwrap();

        if let Some(multiplexer) = &mut self.multiplexer {
            let _ = multiplexer.remove(watch.fd, token);
        }

        if watch.shared.is_cancelled() {
            return;
        }

        if is_error {
            watch
                .shared
                .fail(io::Error::new(io::ErrorKind::Other, "descriptor error"));
        } else {
            watch.shared.fire();
        }
    }

    fn fire_due_timers(&mut self) {
        let now = Instant::now();

        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }

            let timer = self.timers.pop().unwrap();

            if timer.cancelled.load(Ordering::Acquire) {
                continue;
            }

            timer.waker.wake();
        }
    }
}
