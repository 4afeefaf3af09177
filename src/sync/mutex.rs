use std::cell::UnsafeCell;
use std::collections::VecDeque;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};

/// An asynchronous mutex.
///
/// Tasks that cannot acquire the lock are suspended instead of blocking
/// their thread, and are woken one at a time as the lock is released.
pub struct Mutex<T> {
    locked: AtomicBool,
    waiters: StdMutex<VecDeque<Waker>>,
    data: UnsafeCell<T>,
}

// Safety: access to `data` is serialized by the `locked` flag; the waiters
// queue is guarded by its own lock.
unsafe impl<T: Send> Send for Mutex<T> {}
unsafe impl<T: Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    /// Creates an unlocked mutex wrapping the given value.
    pub fn new(value: T) -> Mutex<T> {
        Self {
            locked: AtomicBool::new(false),
            waiters: StdMutex::new(VecDeque::new()),
            data: UnsafeCell::new(value),
        }
    }

    /// Resolves to a guard once the lock is acquired.
    pub fn lock(&self) -> LockFuture<'_, T> {
        LockFuture { mutex: self }
    }

    fn try_acquire(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }
}

/// Future returned by [`Mutex::lock`].
pub struct LockFuture<'a, T> {
    mutex: &'a Mutex<T>,
}

impl<'a, T> Future for LockFuture<'a, T> {
    type Output = MutexGuard<'a, T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.mutex.try_acquire() {
            return Poll::Ready(MutexGuard { mutex: self.mutex });
        }

        self.mutex
            .waiters
            .lock()
            .unwrap()
            .push_back(cx.waker().clone());

        // An unlock between the failed acquire and the registration above
        // has already popped its waiter; retry so that release is not lost.
        if self.mutex.try_acquire() {
            return Poll::Ready(MutexGuard { mutex: self.mutex });
        }

        Poll::Pending
    }
}

/// Guard returned by [`Mutex::lock`]; releases the lock when dropped.
pub struct MutexGuard<'a, T> {
    mutex: &'a Mutex<T>,
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.locked.store(false, Ordering::Release);

        if let Some(waker) = self.mutex.waiters.lock().unwrap().pop_front() {
            waker.wake();
        }
    }
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.mutex.data.get() }
    }
}
