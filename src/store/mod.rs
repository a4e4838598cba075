//! store — local persistence seams (page bytes + per-page sync state).
//!
//! Both stores are namespaced by database name (from the manifest) and keyed
//! by page number. Within one synchronize run each key is written by at most
//! one task; runs themselves are serialized by the watcher.
//!
//! Commit order per page is fixed: bytes into the PageStore first, then the
//! fingerprint into SyncState. The reverse would let a crash mark a page
//! current without its bytes on disk.

use anyhow::Result;

pub trait PageStore: Send + Sync {
    /// Create the namespace if missing. Idempotent.
    fn ensure_namespace(&self, ns: &str) -> Result<()>;

    fn put(&self, ns: &str, key: &str, bytes: &[u8]) -> Result<()>;

    fn get(&self, ns: &str, key: &str) -> Result<Option<Vec<u8>>>;
}

pub trait SyncState: Send + Sync {
    /// Create the namespace if missing. Idempotent.
    fn ensure_namespace(&self, ns: &str) -> Result<()>;

    /// Last applied fingerprint for a page, if any.
    fn get(&self, ns: &str, page: u64) -> Result<Option<String>>;

    /// Record the fingerprint just committed for a page. Called immediately
    /// after the page's byte write, never batched.
    fn set(&self, ns: &str, page: u64, fingerprint: &str) -> Result<()>;
}

mod fs;

pub use fs::{FsPageStore, FsSyncState};
