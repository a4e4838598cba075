#![allow(non_snake_case)]

// Base modules
pub mod consts;
pub mod config;
pub mod errors;
pub mod metrics;

// Modular layout (folders with mod.rs)
pub mod net;      // src/net/{mod,gateway}.rs
pub mod store;    // src/store/{mod,fs}.rs
pub mod fetch;    // src/fetch/mod.rs
pub mod resolve;  // src/resolve/mod.rs
pub mod manifest; // src/manifest/{mod,loader}.rs
pub mod sync;     // src/sync/mod.rs
pub mod watch;    // src/watch/mod.rs

// Utilities (now_secs, ...)
pub mod util;     // src/util/mod.rs

// Convenient re-exports
pub use config::MirrorConfig;
pub use manifest::{ConfigurationLoader, Manifest};
pub use net::{ContentClient, GatewayClient, NameService};
pub use resolve::{SnapshotRef, VersionResolver};
pub use store::{FsPageStore, FsSyncState, PageStore, SyncState};
pub use sync::{SizeRecord, SyncReport, Synchronizer};
pub use watch::{TickOutcome, Watcher};
