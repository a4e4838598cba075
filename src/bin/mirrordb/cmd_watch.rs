use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use MirrorDB::{MirrorConfig, Watcher};

use crate::util::{build_stack, parse_ref, store_root};

pub fn exec(reference: String, store: Option<PathBuf>) -> Result<()> {
    let cfg = MirrorConfig::from_env();
    info!("{}", cfg);

    // A malformed reference is fatal here, before the loop starts; inside
    // the loop only transient errors remain.
    let sref = parse_ref(&reference)?;
    let root = store_root(&cfg, store);
    let stack = build_stack(&cfg, &root)?;

    let mut watcher = Watcher::new(stack.resolver, stack.loader, stack.sync, sref, &cfg);

    info!("watching {} (store {})", reference, root.display());
    let stop = AtomicBool::new(false);
    watcher.run(&stop);
    Ok(())
}
