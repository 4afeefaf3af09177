use fibra::RuntimeBuilder;
use fibra::task::spawn;
use fibra::yield_now;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_block_on_plain_value() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async { 42 });
    assert_eq!(result, 42);
}

#[test]
fn test_spawn_and_await() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = spawn(async { 21 });
        handle.await * 2
    });

    assert_eq!(result, 42);
}

#[test]
fn test_eager_start_runs_body_before_spawn_returns() {
    let rt = RuntimeBuilder::new().build();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let o = order.clone();
    rt.block_on(async move {
        let inner = o.clone();
        let handle = spawn(async move {
            inner.lock().unwrap().push("body");
        });

        // The body never suspends, so it already ran on this thread.
        o.lock().unwrap().push("after-spawn");
        handle.await;
    });

    assert_eq!(*order.lock().unwrap(), vec!["body", "after-spawn"]);
}

#[test]
fn test_completed_task_resumes_awaiter_inline() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = spawn(async { "done" });
        // The task completed during spawn; the await must resolve on the
        // first poll without a trip through the scheduler.
        assert!(handle.is_finished());
        handle.await
    });

    assert_eq!(result, "done");
}

#[test]
fn test_awaiter_resumed_exactly_once_for_slow_task() {
    let rt = RuntimeBuilder::new().build();
    let resumes = Arc::new(AtomicUsize::new(0));

    let r = resumes.clone();
    rt.block_on(async move {
        let handle = spawn(async {
            for _ in 0..10 {
                yield_now().await;
            }
            7
        });

        let value = handle.await;
        r.fetch_add(1, Ordering::SeqCst);
        assert_eq!(value, 7);
    });

    assert_eq!(resumes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_chain_spawn() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle1 = spawn(async {
            let handle2 = spawn(async {
                let handle3 = spawn(async { 10 });
                handle3.await + 20
            });
            handle2.await + 30
        });
        handle1.await + 40
    });

    assert_eq!(result, 100);
}

#[test]
fn test_many_tasks() {
    let rt = RuntimeBuilder::new().build();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    rt.block_on(async move {
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let counter = c.clone();
                spawn(async move {
                    yield_now().await;
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.await;
        }
    });

    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
fn test_spawned_values_come_back_in_order() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handles: Vec<_> = (0..10).map(|i| spawn(async move { i * 2 })).collect();

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await);
        }
        values
    });

    assert_eq!(result, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
}

#[test]
#[should_panic(expected = "task body failed")]
fn test_task_panic_reaches_the_awaiter() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let handle = spawn(async {
            yield_now().await;
            panic!("task body failed");
        });
        handle.await;
    });
}

#[test]
fn test_dropping_a_handle_detaches_the_task() {
    let rt = RuntimeBuilder::new().build();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    rt.block_on(async move {
        let inner = c.clone();
        drop(spawn(async move {
            yield_now().await;
            inner.fetch_add(1, Ordering::SeqCst);
        }));

        // Let the detached task finish on the executor.
        fibra::time::sleep(std::time::Duration::from_millis(100)).await;
    });

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sequential_runtimes() {
    for n in 1..=4 {
        let rt = RuntimeBuilder::new().build();
        let result = rt.block_on(async move { n * 10 });
        assert_eq!(result, n * 10);
        drop(rt);
    }
}
