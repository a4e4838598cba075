//! Shared constants (sentinel keys, reference protocols, tunable defaults).

// -------- PageStore keys --------

/// Sentinel PageStore key for the derived size/metadata record.
/// Written from page 0 of each applied snapshot, before any non-zero page.
pub const META_SENTINEL_KEY: &str = "-1";

/// File extension for per-page fingerprint records in the fs SyncState.
pub const STATE_FILE_EXT: &str = "fpr";

// -------- Snapshot references --------

/// Mutable pointer protocol segment ("/ipns/<name>").
pub const PROTO_MUTABLE: &str = "ipns";
/// Immutable snapshot protocol segment ("/ipfs/<id>").
pub const PROTO_IMMUTABLE: &str = "ipfs";

// -------- Defaults (overridable via M1_* env or builder) --------

pub const DEFAULT_FETCH_CONCURRENCY: usize = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_RESOLVE_CACHE_SECS: u64 = 15;
pub const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_OBJECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_FAIL_ESCALATE_AFTER: u32 = 10;
pub const DEFAULT_BACKOFF_CAP_TICKS: u32 = 4;
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";
