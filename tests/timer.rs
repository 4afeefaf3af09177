use fibra::RuntimeBuilder;
use fibra::error::Elapsed;
use fibra::task::spawn;
use fibra::time::{sleep, timeout};

use std::time::{Duration, Instant};

#[test]
fn test_sleep_waits_at_least_the_duration() {
    let rt = RuntimeBuilder::new().build();

    let started = Instant::now();
    rt.block_on(async {
        sleep(Duration::from_millis(100)).await;
    });

    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_sleeps_run_concurrently_across_tasks() {
    let rt = RuntimeBuilder::new().build();

    let started = Instant::now();
    rt.block_on(async {
        let handles: Vec<_> = (0..5)
            .map(|_| spawn(async { sleep(Duration::from_millis(100)).await }))
            .collect();

        for handle in handles {
            handle.await;
        }
    });

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    // Five concurrent sleeps, not five sequential ones.
    assert!(elapsed < Duration::from_millis(400));
}

#[test]
fn test_timeout_passes_through_a_fast_future() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        timeout(Duration::from_millis(500), async {
            sleep(Duration::from_millis(10)).await;
            "fast"
        })
        .await
    });

    assert_eq!(result, Ok("fast"));
}

#[test]
fn test_timeout_elapses_on_a_slow_future() {
    let rt = RuntimeBuilder::new().build();

    let started = Instant::now();
    let result = rt.block_on(async {
        timeout(Duration::from_millis(100), async {
            sleep(Duration::from_secs(30)).await;
            "slow"
        })
        .await
    });

    assert_eq!(result, Err(Elapsed));
    // The losing sleep must not keep the runtime alive for 30 seconds.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_timer_ordering() {
    let rt = RuntimeBuilder::new().build();

    let order = rt.block_on(async {
        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let slow = {
            let order = order.clone();
            spawn(async move {
                sleep(Duration::from_millis(200)).await;
                order.lock().unwrap().push("slow");
            })
        };
        let fast = {
            let order = order.clone();
            spawn(async move {
                sleep(Duration::from_millis(50)).await;
                order.lock().unwrap().push("fast");
            })
        };

        fast.await;
        slow.await;

        std::sync::Arc::try_unwrap(order).unwrap().into_inner().unwrap()
    });

    assert_eq!(order, vec!["fast", "slow"]);
}
