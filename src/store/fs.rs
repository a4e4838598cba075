//! store/fs — filesystem adapters for PageStore/SyncState.
//!
//! Layout under the store root:
//!   <root>/<ns>/pages/<key>         raw page bytes (key is the page number,
//!                                   "-1" for the size record)
//!   <root>/<ns>/state/<page>.fpr    last-applied fingerprint
//!   <root>/<ns>/ns.lock             provisioning lock
//!
//! All writes go through tmp+rename so a crash never leaves a torn record.
//! Provisioning takes an exclusive fs2 lock so two processes racing on the
//! same namespace do not interleave directory creation.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::consts::STATE_FILE_EXT;
use crate::store::{PageStore, SyncState};

pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn pages_dir(&self, ns: &str) -> PathBuf {
        self.root.join(ns).join("pages")
    }
}

impl PageStore for FsPageStore {
    fn ensure_namespace(&self, ns: &str) -> Result<()> {
        provision_dir(&self.root, ns, "pages")
    }

    fn put(&self, ns: &str, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.pages_dir(ns).join(key);
        write_atomic(&path, bytes).with_context(|| format!("put page '{}/{}'", ns, key))
    }

    fn get(&self, ns: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.pages_dir(ns).join(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut f = OpenOptions::new()
            .read(true)
            .open(&path)
            .with_context(|| format!("open page {}", path.display()))?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        Ok(Some(buf))
    }
}

pub struct FsSyncState {
    root: PathBuf,
}

impl FsSyncState {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn state_dir(&self, ns: &str) -> PathBuf {
        self.root.join(ns).join("state")
    }

    fn record_path(&self, ns: &str, page: u64) -> PathBuf {
        self.state_dir(ns).join(format!("{}.{}", page, STATE_FILE_EXT))
    }

    /// Number of pages with a recorded fingerprint (for status output).
    pub fn recorded_pages(&self, ns: &str) -> Result<u64> {
        let dir = self.state_dir(ns);
        if !dir.exists() {
            return Ok(0);
        }
        let mut n = 0u64;
        for e in fs::read_dir(&dir).with_context(|| format!("read_dir {}", dir.display()))? {
            let p = e?.path();
            if p.extension().map(|ext| ext == STATE_FILE_EXT).unwrap_or(false) {
                n += 1;
            }
        }
        Ok(n)
    }
}

impl SyncState for FsSyncState {
    fn ensure_namespace(&self, ns: &str) -> Result<()> {
        provision_dir(&self.root, ns, "state")
    }

    fn get(&self, ns: &str, page: u64) -> Result<Option<String>> {
        let path = self.record_path(ns, page);
        if !path.exists() {
            return Ok(None);
        }
        let mut s = String::new();
        OpenOptions::new()
            .read(true)
            .open(&path)
            .with_context(|| format!("open state {}", path.display()))?
            .read_to_string(&mut s)?;
        Ok(Some(s.trim().to_string()))
    }

    fn set(&self, ns: &str, page: u64, fingerprint: &str) -> Result<()> {
        let path = self.record_path(ns, page);
        write_atomic(&path, fingerprint.as_bytes())
            .with_context(|| format!("record fingerprint '{}/{}'", ns, page))
    }
}

// ----------------- shared fs helpers -----------------

fn provision_dir(root: &Path, ns: &str, sub: &str) -> Result<()> {
    let base = root.join(ns);
    fs::create_dir_all(&base).with_context(|| format!("create {}", base.display()))?;

    let lock_path = base.join("ns.lock");
    let lock = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("open lock {}", lock_path.display()))?;
    lock.lock_exclusive()
        .with_context(|| format!("lock_exclusive {}", lock_path.display()))?;

    let dir = base.join(sub);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    }
    // lock released on drop
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    if let Some(parent) = tmp.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .with_context(|| format!("open tmp {}", tmp.display()))?;
        f.write_all(bytes)?;
        let _ = f.sync_all();
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
