//! Concurrency tests for the bill counter.
//!
//! Every issued number must be unique, and together the numbers issued by
//! N concurrent callers must form exactly the N successors of the start.
//! Run with: cargo test -p meridian-orders --test concurrency_tests

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use meridian_core::BillNumber;
use meridian_orders::{BillCounter, MemoryOrderStore};

/// The `count` bill numbers that follow `start`, in order.
fn expected_range(start: BillNumber, count: usize) -> Vec<BillNumber> {
    std::iter::successors(Some(start.successor()), |n| Some(n.successor()))
        .take(count)
        .collect()
}

fn assert_contiguous(mut issued: Vec<BillNumber>, start: BillNumber) {
    let total = issued.len();
    let unique: HashSet<BillNumber> = issued.iter().copied().collect();
    assert_eq!(unique.len(), total, "Found duplicate bill numbers");

    issued.sort();
    assert_eq!(issued, expected_range(start, total));
}

// =============================================================================
// OS Threads
// =============================================================================

#[test]
fn parallel_threads_issue_contiguous_range() {
    let start = BillNumber::new(4, 900).unwrap();
    let counter = Arc::new(BillCounter::starting_at(start));
    let num_threads = 8;
    let calls_per_thread = 250;

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                (0..calls_per_thread)
                    .map(|_| c.next().parse::<BillNumber>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let issued: Vec<BillNumber> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(issued.len(), num_threads * calls_per_thread);
    // 2000 numbers from 004-900 cross two rollovers
    assert_contiguous(issued, start);
    assert_eq!(counter.current().to_string(), "006-902");
}

#[test]
fn each_thread_sees_increasing_numbers() {
    let counter = Arc::new(BillCounter::default());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                let seen: Vec<BillNumber> = (0..500).map(|_| c.next_number()).collect();
                seen.windows(2).all(|w| w[0] < w[1])
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap(), "Numbers went backwards within a thread");
    }
}

// =============================================================================
// Tokio Tasks
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_after_recovery() {
    let store = MemoryOrderStore::new();
    store.seed_bill_number("tenant-a", Some("012-998"));

    let counter = Arc::new(BillCounter::default());
    counter.initialize(&store, "tenant-a").await;

    let tasks: Vec<_> = (0..64)
        .map(|_| {
            let c = Arc::clone(&counter);
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                c.next_number()
            })
        })
        .collect();

    let mut issued = Vec::with_capacity(tasks.len());
    for task in tasks {
        issued.push(task.await.unwrap());
    }

    assert_contiguous(issued, "012-998".parse().unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_initialize_queries_once() {
    let store = MemoryOrderStore::new();
    store.seed_bill_number("tenant-a", Some("020-010"));

    let counter = Arc::new(BillCounter::default());
    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let c = Arc::clone(&counter);
            let s = store.clone();
            tokio::spawn(async move { c.initialize(&s, "tenant-a").await })
        })
        .collect();

    for task in tasks {
        let start = task.await.unwrap();
        assert_eq!(start.resume_from().to_string(), "020-010");
    }

    assert_eq!(counter.next(), "020-011");
}
