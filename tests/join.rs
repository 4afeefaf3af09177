use fibra::RuntimeBuilder;
use fibra::task::{spawn, spawn_joinable};
use fibra::time::sleep;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[test]
fn test_join_returns_the_body_value() {
    let task = spawn_joinable(async { 40 + 2 });
    assert_eq!(task.join().unwrap(), 42);
}

#[test]
fn test_join_before_the_body_starts_still_blocks() {
    // Join immediately, before the bridge thread has necessarily polled
    // the body even once.
    let task = spawn_joinable(async { "ready" });
    assert_eq!(task.join().unwrap(), "ready");
}

#[test]
fn test_join_blocks_until_the_body_returns() {
    let finished = Arc::new(AtomicBool::new(false));

    let f = finished.clone();
    let task = spawn_joinable(async move {
        std::thread::sleep(Duration::from_millis(150));
        f.store(true, Ordering::SeqCst);
        "slow"
    });

    let started = Instant::now();
    let value = task.join().unwrap();

    assert_eq!(value, "slow");
    assert!(finished.load(Ordering::SeqCst));
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_join_surfaces_a_panicking_body() {
    let task = spawn_joinable(async {
        panic!("joinable body failed");
    });

    let error = task.join().unwrap_err();
    let payload = error.into_panic();
    assert_eq!(
        payload.downcast_ref::<&str>().copied(),
        Some("joinable body failed")
    );
}

#[test]
fn test_joinable_inherits_the_runtime_context() {
    let rt = RuntimeBuilder::new().build();

    // Spawned inside the runtime context, the joinable body can still use
    // timers and spawn tasks.
    let task = rt.block_on(async {
        spawn_joinable(async {
            sleep(Duration::from_millis(50)).await;
            let handle = spawn(async { 5 });
            handle.await * 3
        })
    });

    assert_eq!(task.join().unwrap(), 15);
}

#[test]
fn test_many_joinable_tasks() {
    let counter = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let counter = counter.clone();
            spawn_joinable(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                i
            })
        })
        .collect();

    let mut sum = 0;
    for task in tasks {
        sum += task.join().unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 8);
    assert_eq!(sum, 28);
}

#[test]
fn test_joinable_body_waits_on_work_from_another_thread() {
    let event = Arc::new(fibra::sync::ManualResetEvent::new(false));

    let e = event.clone();
    let task = spawn_joinable(async move {
        e.wait().await;
        "released"
    });

    std::thread::sleep(Duration::from_millis(100));
    event.set();

    assert_eq!(task.join().unwrap(), "released");
}
