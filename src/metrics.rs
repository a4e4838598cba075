//! Lightweight global metrics for MirrorDB.
//!
//! Thread-safe atomic counters for the subsystems:
//! - page fetches (committed / skipped / failed, bytes)
//! - synchronize runs
//! - name resolution (lookups / cache hits / failures)
//! - watch ticks

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Pages -----
static PAGES_FETCHED: AtomicU64 = AtomicU64::new(0);
static PAGES_SKIPPED: AtomicU64 = AtomicU64::new(0);
static PAGES_FAILED: AtomicU64 = AtomicU64::new(0);
static PAGE_BYTES_FETCHED: AtomicU64 = AtomicU64::new(0);

// ----- Runs -----
static RUNS_OK: AtomicU64 = AtomicU64::new(0);
static RUNS_FAILED: AtomicU64 = AtomicU64::new(0);

// ----- Resolution -----
static RESOLVES_OK: AtomicU64 = AtomicU64::new(0);
static RESOLVES_CACHED: AtomicU64 = AtomicU64::new(0);
static RESOLVES_FAILED: AtomicU64 = AtomicU64::new(0);

// ----- Watch -----
static NOOP_TICKS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub pages_fetched: u64,
    pub pages_skipped: u64,
    pub pages_failed: u64,
    pub page_bytes_fetched: u64,

    pub runs_ok: u64,
    pub runs_failed: u64,

    pub resolves_ok: u64,
    pub resolves_cached: u64,
    pub resolves_failed: u64,

    pub noop_ticks: u64,
}

impl MetricsSnapshot {
    /// Share of page decisions answered from local state (no fetch).
    pub fn skip_ratio(&self) -> f64 {
        let total = self.pages_fetched + self.pages_skipped;
        if total == 0 {
            0.0
        } else {
            self.pages_skipped as f64 / total as f64
        }
    }

    /// Share of name lookups answered from the bucket cache.
    pub fn resolve_cache_ratio(&self) -> f64 {
        let total = self.resolves_ok + self.resolves_cached;
        if total == 0 {
            0.0
        } else {
            self.resolves_cached as f64 / total as f64
        }
    }
}

// ----- Recorders (pages) -----
pub fn record_page_fetched(bytes: usize) {
    PAGES_FETCHED.fetch_add(1, Ordering::Relaxed);
    PAGE_BYTES_FETCHED.fetch_add(bytes as u64, Ordering::Relaxed);
}
pub fn record_page_skipped() {
    PAGES_SKIPPED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_page_failed() {
    PAGES_FAILED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (runs) -----
pub fn record_run(ok: bool) {
    if ok {
        RUNS_OK.fetch_add(1, Ordering::Relaxed);
    } else {
        RUNS_FAILED.fetch_add(1, Ordering::Relaxed);
    }
}

// ----- Recorders (resolution) -----
pub fn record_resolve_ok() {
    RESOLVES_OK.fetch_add(1, Ordering::Relaxed);
}
pub fn record_resolve_cached() {
    RESOLVES_CACHED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_resolve_failed() {
    RESOLVES_FAILED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (watch) -----
pub fn record_noop_tick() {
    NOOP_TICKS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        pages_fetched: PAGES_FETCHED.load(Ordering::Relaxed),
        pages_skipped: PAGES_SKIPPED.load(Ordering::Relaxed),
        pages_failed: PAGES_FAILED.load(Ordering::Relaxed),
        page_bytes_fetched: PAGE_BYTES_FETCHED.load(Ordering::Relaxed),

        runs_ok: RUNS_OK.load(Ordering::Relaxed),
        runs_failed: RUNS_FAILED.load(Ordering::Relaxed),

        resolves_ok: RESOLVES_OK.load(Ordering::Relaxed),
        resolves_cached: RESOLVES_CACHED.load(Ordering::Relaxed),
        resolves_failed: RESOLVES_FAILED.load(Ordering::Relaxed),

        noop_ticks: NOOP_TICKS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    PAGES_FETCHED.store(0, Ordering::Relaxed);
    PAGES_SKIPPED.store(0, Ordering::Relaxed);
    PAGES_FAILED.store(0, Ordering::Relaxed);
    PAGE_BYTES_FETCHED.store(0, Ordering::Relaxed);

    RUNS_OK.store(0, Ordering::Relaxed);
    RUNS_FAILED.store(0, Ordering::Relaxed);

    RESOLVES_OK.store(0, Ordering::Relaxed);
    RESOLVES_CACHED.store(0, Ordering::Relaxed);
    RESOLVES_FAILED.store(0, Ordering::Relaxed);

    NOOP_TICKS.store(0, Ordering::Relaxed);
}
