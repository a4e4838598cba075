use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::Arc;

use MirrorDB::{
    ConfigurationLoader, FsPageStore, FsSyncState, GatewayClient, MirrorConfig, SnapshotRef,
    Synchronizer, VersionResolver,
};
use MirrorDB::fetch::FetchPool;

/// Everything a sync pass needs, wired against the HTTP gateway and the
/// filesystem adapters.
pub struct Stack {
    pub resolver: VersionResolver,
    pub loader: ConfigurationLoader,
    pub sync: Synchronizer,
}

pub fn build_stack(cfg: &MirrorConfig, store: &PathBuf) -> Result<Stack> {
    let gw = Arc::new(GatewayClient::new(cfg)?);
    let pages = Arc::new(FsPageStore::new(store));
    let state = Arc::new(FsSyncState::new(store));
    let pool = Arc::new(FetchPool::new(cfg.fetch_concurrency));

    let resolver = VersionResolver::new(gw.clone(), cfg.resolve_cache_secs);
    let loader = ConfigurationLoader::new(gw.clone(), pages.clone(), state.clone());
    let sync = Synchronizer::new(gw, pages, state, pool);

    Ok(Stack {
        resolver,
        loader,
        sync,
    })
}

/// CLI flag wins, then M1_STORE_DIR, then ./mirror.
pub fn store_root(cfg: &MirrorConfig, flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| cfg.store_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./mirror"))
}

/// Parse a reference, turning the typed error into a CLI-fatal one.
pub fn parse_ref(s: &str) -> Result<SnapshotRef> {
    SnapshotRef::parse(s).map_err(|e| anyhow!("{}", e))
}
