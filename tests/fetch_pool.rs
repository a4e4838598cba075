use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;

use MirrorDB::fetch::FetchPool;

#[test]
fn results_round_trip_through_handles() {
    let pool = FetchPool::new(4);
    let handles: Vec<_> = (0..8u64)
        .map(|i| pool.submit(move || Ok(i * i)))
        .collect();
    let got: Vec<u64> = handles
        .into_iter()
        .map(|h| h.wait().expect("job result"))
        .collect();
    assert_eq!(got, vec![0, 1, 4, 9, 16, 25, 36, 49]);
}

#[test]
fn job_errors_are_delivered_not_swallowed() {
    let pool = FetchPool::new(2);
    let ok = pool.submit(|| Ok(1u32));
    let bad = pool.submit::<u32, _>(|| Err(anyhow!("boom")));
    assert_eq!(ok.wait().expect("ok job"), 1);
    let err = bad.wait().expect_err("failing job");
    assert!(format!("{err:#}").contains("boom"));
}

#[test]
fn in_flight_jobs_never_exceed_the_limit() {
    let pool = FetchPool::new(4);
    let current = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let current = current.clone();
            let max_seen = max_seen.clone();
            pool.submit(move || {
                let cur = current.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(cur, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
        })
        .collect();
    for h in handles {
        h.wait().expect("job");
    }

    let max = max_seen.load(Ordering::SeqCst);
    assert!(max <= 4, "saw {} concurrent jobs with limit 4", max);
    assert!(max > 0);
}

#[test]
fn single_worker_runs_jobs_in_submission_order() {
    let pool = FetchPool::new(1);
    let order = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..6u32)
        .map(|i| {
            let order = order.clone();
            pool.submit(move || {
                order.lock().unwrap().push(i);
                Ok(())
            })
        })
        .collect();
    for h in handles {
        h.wait().expect("job");
    }

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn cancel_drops_queued_jobs_but_finishes_running_ones() {
    let pool = FetchPool::new(1);

    // occupies the single worker long enough for cancel to land
    let running = pool.submit(|| {
        thread::sleep(Duration::from_millis(150));
        Ok(42u32)
    });
    // these sit in the queue behind it
    let queued_a = pool.submit(|| Ok(1u32));
    let queued_b = pool.submit(|| Ok(2u32));

    pool.cancel();

    // the in-flight job runs to completion
    assert_eq!(running.wait().expect("running job"), 42);
    // queued jobs never start
    queued_a.wait().expect_err("queued job must be dropped");
    queued_b.wait().expect_err("queued job must be dropped");
    // and nothing new is admitted
    let late = pool.submit(|| Ok(3u32));
    let err = late.wait().expect_err("submit after cancel");
    assert!(format!("{err:#}").contains("cancelled"));
}
