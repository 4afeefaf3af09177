/// Task is idle and not scheduled.
///
/// The task exists but is not currently queued or running.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution.
///
/// The task has been scheduled and is waiting in the run queue.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being polled.
///
/// At most one execution context may observe this state at a time.
pub(crate) const RUNNING: usize = 2;

/// Task has completed.
///
/// The body returned (or panicked) and the frame has been dropped; the task
/// will not be polled again.
pub(crate) const COMPLETED: usize = 3;

/// Task was woken while running.
///
/// The task must be re-queued as soon as the current poll finishes.
pub(crate) const NOTIFIED: usize = 4;
