//! Operation counters for the voter store.
//!
//! [`StoreMetrics`] is created by whoever owns the process (the HTTP layer,
//! the dump binary) and handed to the store with
//! [`VoterStore::with_metrics`](crate::VoterStore::with_metrics). Counters
//! are atomics so the object can be shared behind an [`Arc`](std::sync::Arc)
//! without a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Shared operation counters and process start time.
#[derive(Debug)]
pub struct StoreMetrics {
    /// When this metrics object was created.
    started_at: Instant,
    /// Store operations attempted.
    operations: AtomicU64,
    /// Store operations that returned an error.
    failures: AtomicU64,
}

/// Point-in-time copy of [`StoreMetrics`], suitable for a health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Whole seconds since the metrics object was created.
    pub uptime_seconds: u64,
    /// Store operations attempted.
    pub operations: u64,
    /// Store operations that returned an error.
    pub failures: u64,
}

impl StoreMetrics {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            operations: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Record the outcome of one store operation.
    pub fn record(&self, succeeded: bool) {
        self.operations.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Time since the metrics object was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Store operations attempted so far.
    pub fn operations(&self) -> u64 {
        self.operations.load(Ordering::Relaxed)
    }

    /// Store operations that failed so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Copy the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_seconds: self.uptime().as_secs(),
            operations: self.operations(),
            failures: self.failures(),
        }
    }
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}
