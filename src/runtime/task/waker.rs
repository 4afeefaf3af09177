use std::mem;
use std::sync::Arc;
use std::task::{RawWaker, RawWakerVTable, Waker};

/// A reference-counted target that can be woken.
///
/// Implemented by the runtime task (waking re-queues it on the scheduler)
/// and by the parker that drives blocking bridges (waking unparks the
/// driving thread). Both share the vtable below.
pub(crate) trait Wakeable: Send + Sync + 'static {
    fn wake(self: Arc<Self>);
}

/// Creates a [`Waker`] backed by an `Arc<W>`.
///
/// # Safety
///
/// The vtable functions uphold the [`RawWaker`] contract: the data pointer
/// always originates from `Arc::into_raw`, and every clone/wake/drop keeps
/// the strong count balanced.
pub(crate) fn make_waker<W: Wakeable>(target: Arc<W>) -> Waker {
    unsafe {
        Waker::from_raw(RawWaker::new(
            Arc::into_raw(target) as *const (),
            vtable::<W>(),
        ))
    }
}

fn vtable<W: Wakeable>() -> &'static RawWakerVTable {
    &RawWakerVTable::new(
        clone_raw::<W>,
        wake_raw::<W>,
        wake_by_ref_raw::<W>,
        drop_raw::<W>,
    )
}

unsafe fn clone_raw<W: Wakeable>(ptr: *const ()) -> RawWaker {
    let arc = unsafe { Arc::<W>::from_raw(ptr as *const W) };
    let cloned = arc.clone();
    mem::forget(arc);

    RawWaker::new(Arc::into_raw(cloned) as *const (), vtable::<W>())
}

unsafe fn wake_raw<W: Wakeable>(ptr: *const ()) {
    let arc = unsafe { Arc::<W>::from_raw(ptr as *const W) };
    arc.wake();
}

unsafe fn wake_by_ref_raw<W: Wakeable>(ptr: *const ()) {
    let arc = unsafe { Arc::<W>::from_raw(ptr as *const W) };
    arc.clone().wake();
    mem::forget(arc);
}

unsafe fn drop_raw<W: Wakeable>(ptr: *const ()) {
    drop(unsafe { Arc::<W>::from_raw(ptr as *const W) });
}
