//! net/gateway — HTTP gateway adapter (NameService + ContentClient).
//!
//! Endpoints (fixed external shapes, no protocol of our own):
//! - name resolve: GET <api>/api/v0/name/resolve/<name>  -> {"Path": "/ipfs/<id>"}
//! - dag object:   GET <api>/api/v0/dag/get?arg=<id>     -> JSON
//! - raw block:    GET <gateway>/ipfs/<fingerprint>      -> bytes
//!
//! Each concern carries its own timeout (resolve/object/page) so one slow
//! surface cannot stall the others.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use crate::config::MirrorConfig;
use crate::net::{ContentClient, NameService, ResolvedName};
use crate::util::now_secs;

pub struct GatewayClient {
    http: reqwest::blocking::Client,
    api_base: String,
    gateway_base: String,
    resolve_timeout: Duration,
    object_timeout: Duration,
    page_timeout: Duration,
}

impl GatewayClient {
    pub fn new(cfg: &MirrorConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            gateway_base: cfg.gateway_base.trim_end_matches('/').to_string(),
            resolve_timeout: Duration::from_millis(cfg.resolve_timeout_ms),
            object_timeout: Duration::from_millis(cfg.object_timeout_ms),
            page_timeout: Duration::from_millis(cfg.page_timeout_ms),
        })
    }
}

impl NameService for GatewayClient {
    fn resolve(&self, name: &str) -> Result<ResolvedName> {
        let url = format!("{}/api/v0/name/resolve/{}", self.api_base, name);
        let resp = self
            .http
            .get(&url)
            .timeout(self.resolve_timeout)
            .send()
            .with_context(|| format!("name resolve '{}'", name))?
            .error_for_status()
            .with_context(|| format!("name resolve '{}'", name))?;
        let v: serde_json::Value = resp.json().context("parse name resolve response")?;
        let path = v
            .get("Path")
            .and_then(|p| p.as_str())
            .ok_or_else(|| anyhow!("name resolve response for '{}' has no Path", name))?;
        // "/ipfs/<id>" -> "<id>"
        let target = path.rsplit('/').next().unwrap_or(path).to_string();
        if target.is_empty() {
            return Err(anyhow!("name resolve response for '{}' has empty Path", name));
        }
        Ok(ResolvedName {
            target,
            as_of: now_secs(),
        })
    }
}

impl ContentClient for GatewayClient {
    fn get_object(&self, id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/api/v0/dag/get?arg={}", self.api_base, id);
        let resp = self
            .http
            .get(&url)
            .timeout(self.object_timeout)
            .send()
            .with_context(|| format!("dag get {}", id))?
            .error_for_status()
            .with_context(|| format!("dag get {}", id))?;
        resp.json()
            .with_context(|| format!("parse dag object {}", id))
    }

    fn get_block(&self, fingerprint: &str) -> Result<Vec<u8>> {
        let url = format!("{}/ipfs/{}", self.gateway_base, fingerprint);
        let resp = self
            .http
            .get(&url)
            .timeout(self.page_timeout)
            .send()
            .with_context(|| format!("block get {}", fingerprint))?
            .error_for_status()
            .with_context(|| format!("block get {}", fingerprint))?;
        let bytes = resp
            .bytes()
            .with_context(|| format!("read block {}", fingerprint))?;
        Ok(bytes.to_vec())
    }
}
