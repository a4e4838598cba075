//! Typed errors for the sync pipeline.
//!
//! Taxonomy:
//! - ResolveError::Malformed: bad reference, fatal (fail fast, do not retry).
//! - ResolveError::Unavailable: name service down or slow, transient
//!   (retried on the next tick).
//! - PageFetchError: one page's fetch failed; isolated to that task.
//! - SyncError::PagesFailed: the per-run aggregate; pages committed before
//!   the failure stay committed.
//!
//! Configuration-fetch unavailability is not an error at all: the loader
//! returns Ok(None) so the watcher can retry without unwinding.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Reference does not parse as /ipns/<name> or /ipfs/<id>.
    #[error("malformed snapshot reference '{0}'")]
    Malformed(String),

    /// Name-service lookup failed or timed out.
    #[error("name resolution unavailable for '{name}': {reason}")]
    Unavailable { name: String, reason: String },
}

impl ResolveError {
    /// Transient errors are retried by the caller; malformed input is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ResolveError::Unavailable { .. })
    }
}

/// A single page fetch that did not make it to the store.
#[derive(Debug, Error)]
#[error("page {page} ({fingerprint}) fetch failed: {reason}")]
pub struct PageFetchError {
    pub page: u64,
    pub fingerprint: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// Some page tasks failed. `fetched` pages were committed and stay
    /// committed; the next run fetches only what is still stale.
    #[error("{failed} of {attempted} stale pages failed ({fetched} committed)")]
    PagesFailed {
        attempted: usize,
        failed: usize,
        fetched: usize,
    },
}
