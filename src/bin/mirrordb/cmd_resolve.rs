use anyhow::{anyhow, Result};
use std::sync::Arc;

use MirrorDB::{GatewayClient, MirrorConfig, VersionResolver};

use crate::util::parse_ref;

pub fn exec(reference: String) -> Result<()> {
    let cfg = MirrorConfig::from_env();
    let sref = parse_ref(&reference)?;

    let gw = Arc::new(GatewayClient::new(&cfg)?);
    let resolver = VersionResolver::new(gw, cfg.resolve_cache_secs);

    let id = resolver.resolve(&sref).map_err(|e| anyhow!("{}", e))?;
    println!("{}", id);
    Ok(())
}
