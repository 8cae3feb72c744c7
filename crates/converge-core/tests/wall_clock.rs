//! Poll loop against real time, with external state mutated by another
//! thread the way a control-plane reconciler would.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use converge_core::{Evaluation, ExpectationError, PollSchedule, Poller, SystemClock};

#[test]
fn converges_once_background_writer_catches_up() {
    let replicas = Arc::new(AtomicU32::new(0));
    let writer = {
        let replicas = Arc::clone(&replicas);
        thread::spawn(move || {
            for _ in 0..3 {
                thread::sleep(Duration::from_millis(15));
                replicas.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    let poller = Poller::system();
    let result = poller
        .await_expectation(Duration::from_secs(5), || {
            let ready = replicas.load(Ordering::SeqCst);
            if ready >= 3 {
                Evaluation::succeeded(format!("{ready}/3 replicas ready"))
            } else {
                Evaluation::pending(format!("{ready}/3 replicas ready"))
            }
        })
        .unwrap();

    writer.join().unwrap();
    assert_eq!(result.message, "3/3 replicas ready");
    assert!(result.elapsed >= Duration::from_millis(45));
}

#[test]
fn never_converging_state_times_out_no_earlier_than_deadline() {
    let poller = Poller::new(
        Arc::new(SystemClock),
        PollSchedule::fixed(Duration::from_millis(5)),
    );
    let start = Instant::now();
    let err = poller
        .await_expectation(Duration::from_millis(60), || {
            Evaluation::pending("object not found")
        })
        .unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(60));
    assert!(matches!(err, ExpectationError::TimedOut { .. }));
    assert_eq!(err.message(), "object not found");
}

#[test]
fn parallel_waits_do_not_share_deadlines() {
    let poller = Poller::system();
    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let poller = poller.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let settle = Duration::from_millis(10 * (i + 1));
                poller.await_expectation(Duration::from_secs(5), || {
                    if start.elapsed() >= settle {
                        Evaluation::succeeded(format!("worker {i} settled"))
                    } else {
                        Evaluation::pending(format!("worker {i} settling"))
                    }
                })
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let done = handle.join().unwrap().unwrap();
        assert_eq!(done.message, format!("worker {i} settled"));
    }
}
