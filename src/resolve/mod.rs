//! resolve — snapshot references and mutable-name resolution.
//!
//! A reference is either mutable ("/ipns/<name>", resolved through the
//! naming service each time it may have moved) or immutable
//! ("/ipfs/<id>", parsed directly, never touches the network). Mutable
//! lookups are memoized per (name, time bucket) so an aggressive caller
//! cannot hammer an eventually-consistent naming service: within one bucket
//! (15 s by default) repeated resolves return the memoized answer.

use std::sync::{Arc, Mutex};

use log::debug;

use crate::consts::{PROTO_IMMUTABLE, PROTO_MUTABLE};
use crate::errors::ResolveError;
use crate::metrics::{record_resolve_cached, record_resolve_failed, record_resolve_ok};
use crate::net::NameService;
use crate::util::now_secs;

/// Parsed snapshot reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotRef {
    /// Mutable pointer; must be resolved to the current snapshot id.
    Mutable(String),
    /// Immutable snapshot id; used as-is.
    Immutable(String),
}

impl SnapshotRef {
    /// Parse "/ipns/<name>" or "/ipfs/<id>". Segments past the id are
    /// tolerated (publishers sometimes append a path); anything else is
    /// malformed and fatal.
    pub fn parse(s: &str) -> Result<Self, ResolveError> {
        let mut parts = s.split('/');
        let (lead, proto, id) = (parts.next(), parts.next(), parts.next());
        if lead != Some("") {
            return Err(ResolveError::Malformed(s.to_string()));
        }
        let id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(ResolveError::Malformed(s.to_string())),
        };
        match proto {
            Some(PROTO_MUTABLE) => Ok(SnapshotRef::Mutable(id)),
            Some(PROTO_IMMUTABLE) => Ok(SnapshotRef::Immutable(id)),
            _ => Err(ResolveError::Malformed(s.to_string())),
        }
    }
}

struct CacheSlot {
    name: String,
    bucket: u64,
    target: String,
}

/// Mutable-name -> immutable snapshot id, with a bucketed lookup memo.
pub struct VersionResolver {
    names: Arc<dyn NameService>,
    cache_bucket_secs: u64,
    cache: Mutex<Option<CacheSlot>>,
}

impl VersionResolver {
    /// `cache_bucket_secs` = 0 disables the memo (every resolve hits the
    /// naming service).
    pub fn new(names: Arc<dyn NameService>, cache_bucket_secs: u64) -> Self {
        Self {
            names,
            cache_bucket_secs,
            cache: Mutex::new(None),
        }
    }

    pub fn resolve(&self, r: &SnapshotRef) -> Result<String, ResolveError> {
        match r {
            SnapshotRef::Immutable(id) => Ok(id.clone()),
            SnapshotRef::Mutable(name) => self.resolve_name(name),
        }
    }

    fn resolve_name(&self, name: &str) -> Result<String, ResolveError> {
        let bucket = if self.cache_bucket_secs == 0 {
            0
        } else {
            now_secs() / self.cache_bucket_secs
        };

        if self.cache_bucket_secs != 0 {
            let g = self.cache.lock().unwrap();
            if let Some(slot) = g.as_ref() {
                if slot.name == name && slot.bucket == bucket {
                    record_resolve_cached();
                    return Ok(slot.target.clone());
                }
            }
        }

        match self.names.resolve(name) {
            Ok(res) => {
                record_resolve_ok();
                debug!("resolved '{}' -> {} (as of {})", name, res.target, res.as_of);
                let mut g = self.cache.lock().unwrap();
                *g = Some(CacheSlot {
                    name: name.to_string(),
                    bucket,
                    target: res.target.clone(),
                });
                Ok(res.target)
            }
            Err(e) => {
                record_resolve_failed();
                Err(ResolveError::Unavailable {
                    name: name.to_string(),
                    reason: format!("{:#}", e),
                })
            }
        }
    }
}
