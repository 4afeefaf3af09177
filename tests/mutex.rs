use fibra::RuntimeBuilder;
use fibra::sync::Mutex;
use fibra::task::spawn;
use fibra::yield_now;

use std::sync::Arc;

#[test]
fn test_lock_uncontended() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let mutex = Mutex::new(41);
        let mut guard = mutex.lock().await;
        *guard += 1;
        *guard
    });

    assert_eq!(result, 42);
}

#[test]
fn test_contended_increments_are_exclusive() {
    let rt = RuntimeBuilder::new().build();
    let mutex = Arc::new(Mutex::new(0u32));

    let m = mutex.clone();
    rt.block_on(async move {
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let mutex = m.clone();
                spawn(async move {
                    for _ in 0..10 {
                        let mut guard = mutex.lock().await;
                        let value = *guard;
                        yield_now().await;
                        *guard = value + 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await;
        }

        assert_eq!(*m.lock().await, 200);
    });
}

#[test]
fn test_guard_drop_releases_to_the_next_waiter() {
    let rt = RuntimeBuilder::new().build();

    let order = rt.block_on(async {
        let mutex = Arc::new(Mutex::new(()));
        let order = Arc::new(Mutex::new(Vec::new()));

        let held = mutex.lock().await;

        let waiter = {
            let mutex = mutex.clone();
            let order = order.clone();
            spawn(async move {
                let _guard = mutex.lock().await;
                order.lock().await.push("waiter");
            })
        };

        order.lock().await.push("holder");
        drop(held);

        waiter.await;

        let out = order.lock().await.clone();
        out
    });

    assert_eq!(order, vec!["holder", "waiter"]);
}
