//! Poll-until-ready behavior against simulated cluster listings

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use kube_e2e_harness::services::{wait_for_count, wait_for_count_async, wait_until_async};
use kube_e2e_harness::{PollSchedule, WaitError};

const UNIT: Duration = Duration::from_millis(10);

#[test]
fn test_nodes_appear_after_three_listings() {
    common::setup_test_logging();

    let mut listings = 0;
    let listing = wait_for_count::<_, String, _>(
        "three ready nodes",
        PollSchedule::new(UNIT, UNIT * 50),
        3,
        || {
            listings += 1;
            Ok((0..listings).map(|i| format!("node-{i}")).collect())
        },
    )
    .expect("nodes should become ready");

    assert_eq!(listings, 3);
    assert_eq!(listing.items, vec!["node-0", "node-1", "node-2"]);
    assert_eq!(listing.report.attempts, 3);
}

#[test]
fn test_listing_error_is_not_retried() {
    let mut listings = 0;
    let err = wait_for_count::<String, _, _>(
        "pods",
        PollSchedule::new(UNIT, UNIT * 50),
        1,
        || {
            listings += 1;
            Err("forbidden: pods is not allowed".to_string())
        },
    )
    .expect_err("a listing error ends the wait");

    assert_eq!(listings, 1);
    assert!(!err.is_timed_out());
    assert_eq!(err.predicate_error().map(String::as_str), Some("forbidden: pods is not allowed"));
}

#[test]
fn test_never_ready_times_out_near_deadline() {
    let started = Instant::now();
    let err = wait_for_count::<u8, String, _>(
        "namespaces",
        PollSchedule::new(UNIT * 2, UNIT * 10),
        1,
        || Ok(Vec::new()),
    )
    .expect_err("nothing ever appears");

    let waited = started.elapsed();
    match err {
        WaitError::TimedOut { condition, attempts, .. } => {
            assert_eq!(condition, "namespaces");
            assert!(attempts >= 2);
        }
        other => panic!("expected timeout, got {other}"),
    }
    assert!(waited >= UNIT * 10);
    assert!(waited < UNIT * 40);
}

#[tokio::test]
async fn test_async_listing_eventually_ready() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let listing = wait_for_count_async::<u32, String, _, _>(
        "replicas",
        PollSchedule::new(UNIT, UNIT * 50),
        2,
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok((0..n).collect()) }
        },
    )
    .await
    .expect("replicas should scale up");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(listing.items, vec![0, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_checks_on_spawned_tasks() {
    let mut handles = Vec::new();
    for expected in 1..=4usize {
        handles.push(tokio::spawn(async move {
            let seen = Arc::new(AtomicU32::new(0));
            let counter = Arc::clone(&seen);
            wait_for_count_async::<u32, String, _, _>(
                "machine pools",
                PollSchedule::new(UNIT, UNIT * 50),
                expected,
                move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Ok((0..n).collect()) }
                },
            )
            .await
        }));
    }

    for (idx, handle) in handles.into_iter().enumerate() {
        let listing = handle.await.unwrap().expect("each check should pass");
        assert_eq!(listing.items.len(), idx + 1);
    }
}

#[tokio::test]
async fn test_async_predicate_error_surfaces_message() {
    let err = wait_until_async("route admitted", PollSchedule::new(UNIT, UNIT * 20), || async {
        Err::<bool, _>("connection refused")
    })
    .await
    .expect_err("error should end the wait");

    assert_eq!(err.condition(), "route admitted");
    assert!(err.to_string().contains("connection refused"));
}
