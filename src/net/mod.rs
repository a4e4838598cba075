//! net — seams to the naming service and the content-addressed network.
//!
//! The sync core is a client of two fixed external surfaces:
//! - NameService: mutable name -> current immutable snapshot id
//!   (eventually consistent, which is why the watcher polls).
//! - ContentClient: DAG objects as JSON (version index, manifest) and raw
//!   blocks by fingerprint.
//!
//! A block is addressed by the hash of its own content, so anything cached
//! under a fingerprint stays valid indefinitely.

use anyhow::Result;

/// Result of a mutable-name lookup.
#[derive(Debug, Clone)]
pub struct ResolvedName {
    /// Immutable snapshot id the name currently points at.
    pub target: String,
    /// Unix seconds at which the lookup was answered.
    pub as_of: u64,
}

pub trait NameService: Send + Sync {
    /// Resolve a mutable name to its current target. Short timeout; the
    /// answer may lag the latest publish.
    fn resolve(&self, name: &str) -> Result<ResolvedName>;
}

pub trait ContentClient: Send + Sync {
    /// Fetch a DAG object as JSON.
    fn get_object(&self, id: &str) -> Result<serde_json::Value>;

    /// Fetch a raw block by its content fingerprint.
    fn get_block(&self, fingerprint: &str) -> Result<Vec<u8>>;
}

pub mod gateway;

pub use gateway::GatewayClient;
