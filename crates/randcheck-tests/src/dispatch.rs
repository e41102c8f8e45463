//! Batch execution: sequential and thread-pool dispatch over the registry.
//!
//! Both paths return a [`BatchReport`] with one record per requested
//! identifier. The sequential path keeps submission order; the parallel path
//! reports records in completion order.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::error::TestError;
use crate::nist::panic_message;
use crate::params::TestParams;
use crate::record::TestRecord;
use crate::registry::run_test;

/// Upper bound on worker threads when the caller does not choose.
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Aggregate response for a batch of tests against one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<TestRecord>,
    pub count: usize,
    pub sequence_length: usize,
}

impl BatchReport {
    fn new(results: Vec<TestRecord>, sequence_length: usize) -> Self {
        Self {
            count: results.len(),
            results,
            sequence_length,
        }
    }

    /// Stable order for callers that compare parallel output.
    pub fn sort_by_name(&mut self) {
        self.results.sort_by(|a, b| a.test_name.cmp(&b.test_name));
    }

    /// Number of records with the given status.
    pub fn count_status(&self, status: crate::policy::TestStatus) -> usize {
        self.results
            .iter()
            .filter(|r| r.test_status == status)
            .count()
    }
}

/// Run `names` one after another, in order. One failing test never stops
/// the rest.
pub fn run_many<S: AsRef<str>>(names: &[S], bits: &[u8], params: &TestParams) -> BatchReport {
    let results = names
        .iter()
        .map(|name| run_test(name.as_ref(), bits, params))
        .collect();
    BatchReport::new(results, bits.len())
}

/// Pool size: the caller's choice, else `min(available parallelism, tests, 8)`.
pub fn pool_size(tests: usize, max_workers: Option<usize>) -> usize {
    let default = || {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(MAX_DEFAULT_WORKERS)
    };
    max_workers.unwrap_or_else(default).min(tests).max(1)
}

/// Record standing in for a task that died without producing one.
fn worker_fault(name: &str, detail: &str) -> TestRecord {
    log::warn!("{name}: worker fault: {detail}");
    let err = TestError::Computation(format!("worker fault: {detail}"));
    TestRecord::failure(name, Some(&err.to_string()))
}

/// Run `names` on a bounded pool of scoped worker threads sharing read-only
/// access to `bits`. Records come back in completion order.
pub fn run_many_parallel<S: AsRef<str> + Sync>(
    names: &[S],
    bits: &[u8],
    params: &TestParams,
    max_workers: Option<usize>,
) -> BatchReport {
    if names.is_empty() {
        return BatchReport::new(Vec::new(), bits.len());
    }
    let workers = pool_size(names.len(), max_workers);
    log::debug!("dispatching {} tests on {workers} workers", names.len());

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, TestRecord)>();
    let mut results = Vec::with_capacity(names.len());
    let mut reported = vec![false; names.len()];

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let tx = tx.clone();
                let next = &next;
                s.spawn(move || {
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(name) = names.get(idx) else {
                            break;
                        };
                        let name = name.as_ref();
                        let record =
                            match catch_unwind(AssertUnwindSafe(|| run_test(name, bits, params))) {
                                Ok(record) => record,
                                Err(panic) => worker_fault(name, &panic_message(panic.as_ref())),
                            };
                        if tx.send((idx, record)).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(tx);

        for (idx, record) in rx {
            reported[idx] = true;
            results.push(record);
        }
        for handle in handles {
            let _ = handle.join();
        }
    });

    for (idx, done) in reported.iter().enumerate() {
        if !done {
            results.push(worker_fault(
                names[idx].as_ref(),
                "task ended without producing a result",
            ));
        }
    }
    BatchReport::new(results, bits.len())
}
