//! manifest/loader — two-stage configuration fetch.
//!
//! load(snapshot_id):
//! 1. version index object at snapshot_id -> fingerprint of the manifest,
//! 2. manifest object -> normalized Manifest.
//!
//! Either stage failing (missing, timed out, wrong shape) yields Ok(None),
//! a distinguishable "unavailable" the watcher retries next tick, never a
//! crash. On the first successful load for a database name the local
//! PageStore/SyncState namespaces are provisioned, once per process,
//! idempotently.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::manifest::{Manifest, WireManifest, WireVersionIndex};
use crate::net::ContentClient;
use crate::store::{PageStore, SyncState};

pub struct ConfigurationLoader {
    client: Arc<dyn ContentClient>,
    pages: Arc<dyn PageStore>,
    state: Arc<dyn SyncState>,
    provisioned: Mutex<HashSet<String>>,
}

impl ConfigurationLoader {
    pub fn new(
        client: Arc<dyn ContentClient>,
        pages: Arc<dyn PageStore>,
        state: Arc<dyn SyncState>,
    ) -> Self {
        Self {
            client,
            pages,
            state,
            provisioned: Mutex::new(HashSet::new()),
        }
    }

    /// Load the manifest behind `snapshot_id`. Ok(None) means one of the two
    /// object fetches was unavailable; the caller retries next tick.
    pub fn load(&self, snapshot_id: &str) -> Result<Option<Manifest>> {
        let index = match self.client.get_object(snapshot_id) {
            Ok(v) => v,
            Err(e) => {
                warn!("version index {} unavailable: {:#}", snapshot_id, e);
                return Ok(None);
            }
        };
        let index: WireVersionIndex = match serde_json::from_value(index) {
            Ok(i) => i,
            Err(e) => {
                warn!("version index {} has unexpected shape: {}", snapshot_id, e);
                return Ok(None);
            }
        };

        let manifest_fpr = index.versions.current.fingerprint().to_string();
        debug!("version index {} -> manifest {}", snapshot_id, manifest_fpr);

        let manifest_obj = match self.client.get_object(&manifest_fpr) {
            Ok(v) => v,
            Err(e) => {
                warn!("manifest {} unavailable: {:#}", manifest_fpr, e);
                return Ok(None);
            }
        };
        let wire: WireManifest = match serde_json::from_value(manifest_obj) {
            Ok(w) => w,
            Err(e) => {
                warn!("manifest {} has unexpected shape: {}", manifest_fpr, e);
                return Ok(None);
            }
        };

        let manifest = wire.normalize();
        self.provision(&manifest.name)?;
        Ok(Some(manifest))
    }

    // Once per database name per process; the adapters themselves are
    // idempotent too, this just spares repeated fs round-trips.
    fn provision(&self, name: &str) -> Result<()> {
        let mut g = self.provisioned.lock().unwrap();
        if g.contains(name) {
            return Ok(());
        }
        self.pages
            .ensure_namespace(name)
            .with_context(|| format!("provision page store '{}'", name))?;
        self.state
            .ensure_namespace(name)
            .with_context(|| format!("provision sync state '{}'", name))?;
        g.insert(name.to_string());
        info!("provisioned local namespaces for '{}'", name);
        Ok(())
    }
}
