use anyhow::Result;
use std::path::PathBuf;

use MirrorDB::consts::META_SENTINEL_KEY;
use MirrorDB::store::PageStore;
use MirrorDB::{FsPageStore, FsSyncState, MirrorConfig, SizeRecord};

use crate::util::store_root;

pub fn exec(name: String, store: Option<PathBuf>, json: bool) -> Result<()> {
    let cfg = MirrorConfig::from_env();
    let root = store_root(&cfg, store);

    let pages = FsPageStore::new(&root);
    let state = FsSyncState::new(&root);

    let record: Option<SizeRecord> = match pages.get(&name, META_SENTINEL_KEY)? {
        Some(buf) => serde_json::from_slice(&buf).ok(),
        None => None,
    };
    let recorded = state.recorded_pages(&name)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "name": name,
                "store": root.display().to_string(),
                "snapshot": record.as_ref().map(|r| r.snapshot.clone()),
                "size": record.as_ref().map(|r| r.size),
                "recorded_pages": recorded,
            })
        );
        return Ok(());
    }

    println!("name:           {}", name);
    println!("store:          {}", root.display());
    match &record {
        Some(r) => {
            println!("snapshot:       {}", r.snapshot);
            println!("logical size:   {} bytes", r.size);
        }
        None => println!("snapshot:       (no size record yet)"),
    }
    println!("recorded pages: {}", recorded);
    Ok(())
}
