use anyhow::{anyhow, Result};
use std::path::PathBuf;

use MirrorDB::MirrorConfig;

use crate::util::{build_stack, parse_ref, store_root};

pub fn exec(reference: String, store: Option<PathBuf>, json: bool) -> Result<()> {
    let cfg = MirrorConfig::from_env();
    let sref = parse_ref(&reference)?;
    let root = store_root(&cfg, store);
    let stack = build_stack(&cfg, &root)?;

    let id = stack.resolver.resolve(&sref).map_err(|e| anyhow!("{}", e))?;
    let manifest = stack
        .loader
        .load(&id)?
        .ok_or_else(|| anyhow!("configuration for {} unavailable", id))?;
    let report = stack.sync.synchronize(&manifest, &id)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "name": manifest.name,
                "snapshot": id,
                "total_pages": report.total_pages,
                "fetched": report.fetched,
                "skipped": report.skipped,
            })
        );
    } else {
        println!(
            "'{}' converged on {}: {} fetched, {} skipped of {} pages",
            manifest.name, id, report.fetched, report.skipped, report.total_pages
        );
    }
    Ok(())
}
