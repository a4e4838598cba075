//! sync — the incremental page synchronizer.
//!
//! synchronize() converges the local copy on a manifest:
//! - pages whose recorded fingerprint matches the manifest are skipped
//!   (no fetch, no write),
//! - page 0, when stale, is fetched in-line before anything else; its byte
//!   length times the page count lands as the size record under the "-1"
//!   sentinel key, so the size is visible before any non-zero page commit,
//! - remaining stale pages fetch concurrently under the pool's global cap,
//! - per page: bytes into the PageStore first, then the fingerprint into
//!   SyncState. A crash between the two leaves the state stale and the page
//!   is simply re-fetched next run, never the reverse.
//!
//! One failed page fails the run as a whole; pages already committed stay
//! committed (no rollback), so the next run fetches only what is still
//! stale. Repeat calls with the same manifest are no-ops.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::consts::META_SENTINEL_KEY;
use crate::errors::{PageFetchError, SyncError};
use crate::fetch::FetchPool;
use crate::manifest::Manifest;
use crate::metrics::{record_page_failed, record_page_fetched, record_page_skipped, record_run};
use crate::net::ContentClient;
use crate::store::{PageStore, SyncState};

/// Derived metadata record stored under the sentinel key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRecord {
    /// Logical file size: page 0 byte length times the page count.
    pub size: u64,
    /// Snapshot id the size was derived from.
    pub snapshot: String,
}

/// Outcome of one synchronize() run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub total_pages: u64,
    pub fetched: u64,
    pub skipped: u64,
}

pub struct Synchronizer {
    client: Arc<dyn ContentClient>,
    pages: Arc<dyn PageStore>,
    state: Arc<dyn SyncState>,
    pool: Arc<FetchPool>,
}

impl Synchronizer {
    pub fn new(
        client: Arc<dyn ContentClient>,
        pages: Arc<dyn PageStore>,
        state: Arc<dyn SyncState>,
        pool: Arc<FetchPool>,
    ) -> Self {
        Self {
            client,
            pages,
            state,
            pool,
        }
    }

    /// Converge the local copy on `manifest`. `snapshot_id` is recorded in
    /// the size record so readers can tell which version the size belongs
    /// to. Idempotent; a superseding manifest applies only the delta.
    pub fn synchronize(&self, manifest: &Manifest, snapshot_id: &str) -> Result<SyncReport> {
        let res = self.run(manifest, snapshot_id);
        record_run(res.is_ok());
        res
    }

    fn run(&self, manifest: &Manifest, snapshot_id: &str) -> Result<SyncReport> {
        let ns = manifest.name.as_str();
        let total = manifest.total_pages();

        // Decide what is stale before fetching anything.
        let mut stale: Vec<(u64, &str)> = Vec::new();
        for (i, fpr) in manifest.page_fingerprints.iter().enumerate() {
            let page = i as u64;
            let current = self
                .state
                .get(ns, page)
                .with_context(|| format!("read sync state for page {}", page))?;
            if current.as_deref() == Some(fpr.as_str()) {
                record_page_skipped();
                continue;
            }
            stale.push((page, fpr.as_str()));
        }

        if stale.is_empty() {
            debug!("'{}': all {} pages current, nothing to fetch", ns, total);
            return Ok(SyncReport {
                total_pages: total,
                fetched: 0,
                skipped: total,
            });
        }
        info!("'{}': {} of {} pages stale", ns, stale.len(), total);

        let mut fetched = 0u64;

        // Page 0 first, in-line: callers rely on the size record being
        // present before any non-zero page commit is observable.
        let mut rest: &[(u64, &str)] = &stale;
        if stale[0].0 == 0 {
            if let Err(e) = self.sync_page_zero(ns, stale[0].1, total, snapshot_id) {
                record_page_failed();
                return Err(e);
            }
            fetched += 1;
            rest = &stale[1..];
        }

        let mut handles = Vec::with_capacity(rest.len());
        for &(page, fpr) in rest {
            let client = Arc::clone(&self.client);
            let pages = Arc::clone(&self.pages);
            let state = Arc::clone(&self.state);
            let ns_owned = ns.to_string();
            let fpr_owned = fpr.to_string();
            let handle = self.pool.submit(move || {
                fetch_and_commit(&*client, &*pages, &*state, &ns_owned, page, &fpr_owned)
            });
            handles.push((page, handle));
        }

        let mut failed = 0usize;
        for (page, handle) in handles {
            match handle.wait() {
                Ok(len) => {
                    fetched += 1;
                    debug!("'{}': page {} committed ({} bytes)", ns, page, len);
                }
                Err(e) => {
                    failed += 1;
                    record_page_failed();
                    warn!("'{}': page {} failed: {:#}", ns, page, e);
                }
            }
        }

        if failed > 0 {
            return Err(SyncError::PagesFailed {
                attempted: stale.len(),
                failed,
                fetched: fetched as usize,
            }
            .into());
        }

        Ok(SyncReport {
            total_pages: total,
            fetched,
            skipped: total - stale.len() as u64,
        })
    }

    fn sync_page_zero(&self, ns: &str, fpr: &str, total: u64, snapshot_id: &str) -> Result<()> {
        let bytes = self.client.get_block(fpr).map_err(|e| PageFetchError {
            page: 0,
            fingerprint: fpr.to_string(),
            reason: format!("{:#}", e),
        })?;

        let record = SizeRecord {
            size: bytes.len() as u64 * total,
            snapshot: snapshot_id.to_string(),
        };
        let buf = serde_json::to_vec(&record).context("serialize size record")?;
        self.pages
            .put(ns, META_SENTINEL_KEY, &buf)
            .context("write size record")?;
        info!(
            "'{}': size record {} bytes ({} pages of {})",
            ns,
            record.size,
            total,
            bytes.len()
        );

        self.pages.put(ns, "0", &bytes).context("store page 0")?;
        self.state
            .set(ns, 0, fpr)
            .context("record fingerprint for page 0")?;
        record_page_fetched(bytes.len());
        Ok(())
    }
}

fn fetch_and_commit(
    client: &dyn ContentClient,
    pages: &dyn PageStore,
    state: &dyn SyncState,
    ns: &str,
    page: u64,
    fpr: &str,
) -> Result<usize> {
    let bytes = client.get_block(fpr).map_err(|e| PageFetchError {
        page,
        fingerprint: fpr.to_string(),
        reason: format!("{:#}", e),
    })?;

    // Bytes first, state second: a crash in between re-fetches the page.
    pages
        .put(ns, &page.to_string(), &bytes)
        .with_context(|| format!("store page {}", page))?;
    state
        .set(ns, page, fpr)
        .with_context(|| format!("record fingerprint for page {}", page))?;

    record_page_fetched(bytes.len());
    Ok(bytes.len())
}
