//! Centralized configuration for MirrorDB.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - MirrorConfig::from_env() reads M1_* env vars; fluent setters override.
//!
//! The fetch concurrency cap is the main throughput/backpressure dial: the
//! observed useful range is 2–100. The poll interval trades detection
//! latency against load on an eventually-consistent naming service, so it
//! stays in single-digit seconds by default.

use std::fmt;

use crate::consts::{
    DEFAULT_API_BASE, DEFAULT_BACKOFF_CAP_TICKS, DEFAULT_FAIL_ESCALATE_AFTER,
    DEFAULT_FETCH_CONCURRENCY, DEFAULT_OBJECT_TIMEOUT_MS, DEFAULT_PAGE_TIMEOUT_MS,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_RESOLVE_CACHE_SECS, DEFAULT_RESOLVE_TIMEOUT_MS,
};

/// Top-level configuration (watcher, synchronizer, gateway adapter).
#[derive(Clone, Debug)]
pub struct MirrorConfig {
    /// Global cap on concurrently in-flight page fetches.
    /// Env: M1_FETCH_CONCURRENCY (default 100)
    pub fetch_concurrency: usize,

    /// Watch loop tick interval in milliseconds.
    /// Env: M1_POLL_INTERVAL_MS (default 5000)
    pub poll_interval_ms: u64,

    /// Width of the name-resolution cache bucket in seconds (0 disables the
    /// cache so every resolve hits the naming service).
    /// Env: M1_RESOLVE_CACHE_SECS (default 15)
    pub resolve_cache_secs: u64,

    /// Name-service lookup timeout in milliseconds.
    /// Env: M1_RESOLVE_TIMEOUT_MS (default 1000)
    pub resolve_timeout_ms: u64,

    /// Version-index/manifest object fetch timeout in milliseconds.
    /// Env: M1_OBJECT_TIMEOUT_MS (default 5000)
    pub object_timeout_ms: u64,

    /// Single page fetch timeout in milliseconds.
    /// Env: M1_PAGE_TIMEOUT_MS (default 1000)
    pub page_timeout_ms: u64,

    /// Consecutive failed ticks before the watcher escalates diagnostics
    /// and starts stretching its sleep.
    /// Env: M1_FAIL_ESCALATE_AFTER (default 10)
    pub fail_escalate_after: u32,

    /// Cap on the stretched sleep, as a multiple of the base interval.
    /// Env: M1_BACKOFF_CAP_TICKS (default 4)
    pub backoff_cap_ticks: u32,

    /// Base URL of the naming/DAG API.
    /// Env: M1_API_BASE (default http://127.0.0.1:8080)
    pub api_base: String,

    /// Base URL for raw block fetches. Falls back to api_base when unset.
    /// Env: M1_GATEWAY_BASE
    pub gateway_base: String,

    /// Root directory for the filesystem store adapters, if configured via
    /// env rather than CLI.
    /// Env: M1_STORE_DIR
    pub store_dir: Option<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            resolve_cache_secs: DEFAULT_RESOLVE_CACHE_SECS,
            resolve_timeout_ms: DEFAULT_RESOLVE_TIMEOUT_MS,
            object_timeout_ms: DEFAULT_OBJECT_TIMEOUT_MS,
            page_timeout_ms: DEFAULT_PAGE_TIMEOUT_MS,
            fail_escalate_after: DEFAULT_FAIL_ESCALATE_AFTER,
            backoff_cap_ticks: DEFAULT_BACKOFF_CAP_TICKS,
            api_base: DEFAULT_API_BASE.to_string(),
            gateway_base: DEFAULT_API_BASE.to_string(),
            store_dir: None,
        }
    }
}

impl MirrorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("M1_FETCH_CONCURRENCY") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.fetch_concurrency = n.max(1);
            }
        }
        if let Ok(v) = std::env::var("M1_POLL_INTERVAL_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.poll_interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("M1_RESOLVE_CACHE_SECS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.resolve_cache_secs = n;
            }
        }
        if let Ok(v) = std::env::var("M1_RESOLVE_TIMEOUT_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.resolve_timeout_ms = n;
            }
        }
        if let Ok(v) = std::env::var("M1_OBJECT_TIMEOUT_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.object_timeout_ms = n;
            }
        }
        if let Ok(v) = std::env::var("M1_PAGE_TIMEOUT_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.page_timeout_ms = n;
            }
        }
        if let Ok(v) = std::env::var("M1_FAIL_ESCALATE_AFTER") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.fail_escalate_after = n.max(1);
            }
        }
        if let Ok(v) = std::env::var("M1_BACKOFF_CAP_TICKS") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.backoff_cap_ticks = n.max(1);
            }
        }
        if let Ok(v) = std::env::var("M1_API_BASE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.api_base = s.to_string();
                // gateway follows the API base unless set explicitly below
                cfg.gateway_base = s.to_string();
            }
        }
        if let Ok(v) = std::env::var("M1_GATEWAY_BASE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.gateway_base = s.to_string();
            }
        }
        if let Ok(v) = std::env::var("M1_STORE_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.store_dir = Some(s.to_string());
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n.max(1);
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_resolve_cache_secs(mut self, secs: u64) -> Self {
        self.resolve_cache_secs = secs;
        self
    }

    pub fn with_resolve_timeout_ms(mut self, ms: u64) -> Self {
        self.resolve_timeout_ms = ms;
        self
    }

    pub fn with_object_timeout_ms(mut self, ms: u64) -> Self {
        self.object_timeout_ms = ms;
        self
    }

    pub fn with_page_timeout_ms(mut self, ms: u64) -> Self {
        self.page_timeout_ms = ms;
        self
    }

    pub fn with_fail_escalate_after(mut self, n: u32) -> Self {
        self.fail_escalate_after = n.max(1);
        self
    }

    pub fn with_backoff_cap_ticks(mut self, n: u32) -> Self {
        self.backoff_cap_ticks = n.max(1);
        self
    }

    pub fn with_api_base<S: Into<String>>(mut self, base: S) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_gateway_base<S: Into<String>>(mut self, base: S) -> Self {
        self.gateway_base = base.into();
        self
    }

    pub fn with_store_dir<S: Into<String>>(mut self, dir: Option<S>) -> Self {
        self.store_dir = dir.map(Into::into);
        self
    }
}

impl fmt::Display for MirrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MirrorConfig {{ \
             fetch_concurrency: {}, \
             poll_interval_ms: {}, \
             resolve_cache_secs: {}, \
             resolve_timeout_ms: {}, \
             object_timeout_ms: {}, \
             page_timeout_ms: {}, \
             fail_escalate_after: {}, \
             backoff_cap_ticks: {}, \
             api_base: {}, \
             gateway_base: {}, \
             store_dir: {} \
             }}",
            self.fetch_concurrency,
            self.poll_interval_ms,
            self.resolve_cache_secs,
            self.resolve_timeout_ms,
            self.object_timeout_ms,
            self.page_timeout_ms,
            self.fail_escalate_after,
            self.backoff_cap_ticks,
            self.api_base,
            self.gateway_base,
            self.store_dir.as_deref().unwrap_or("unset"),
        )
    }
}
