//! watch — the polling change-detection loop.
//!
//! One tick: resolve the reference, compare against the last fully converged
//! snapshot id, and when it moved, load the manifest and synchronize. The
//! running version advances only after a fully successful run; a failed run
//! leaves it unchanged so the same target is retried next tick.
//!
//! Everything a tick raises is folded into its outcome at the tick boundary;
//! the loop only ends when the caller's stop flag flips. Ticks are
//! serialized by construction (one control thread drives them), so two runs
//! never race on the same store keys.
//!
//! Retry policy: consecutive failed ticks are counted; past a threshold the
//! diagnostic escalates from warn to error and the sleep stretches (doubling
//! per failed tick, capped at a multiple of the base interval). Any
//! successful or no-op tick resets both.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::MirrorConfig;
use crate::manifest::ConfigurationLoader;
use crate::metrics::record_noop_tick;
use crate::resolve::{SnapshotRef, VersionResolver};
use crate::sync::Synchronizer;

/// Watcher phase, as visible between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Resolving,
    Synchronizing,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Resolved id equals the running version; nothing to do.
    NoChange,
    /// A new snapshot fully converged; the running version advanced.
    Synchronized(String),
    /// Resolution, load, or synchronize failed; retried next tick.
    Failed(String),
}

pub struct Watcher {
    resolver: VersionResolver,
    loader: ConfigurationLoader,
    sync: Synchronizer,
    reference: SnapshotRef,
    interval: Duration,
    fail_escalate_after: u32,
    backoff_cap_ticks: u32,
    state: WatchState,
    running_version: Option<String>,
    consecutive_failures: u32,
}

impl Watcher {
    pub fn new(
        resolver: VersionResolver,
        loader: ConfigurationLoader,
        sync: Synchronizer,
        reference: SnapshotRef,
        cfg: &MirrorConfig,
    ) -> Self {
        Self {
            resolver,
            loader,
            sync,
            reference,
            interval: Duration::from_millis(cfg.poll_interval_ms),
            fail_escalate_after: cfg.fail_escalate_after.max(1),
            backoff_cap_ticks: cfg.backoff_cap_ticks.max(1),
            state: WatchState::Idle,
            running_version: None,
            consecutive_failures: 0,
        }
    }

    /// Last snapshot id fully converged on, if any.
    pub fn running_version(&self) -> Option<&str> {
        self.running_version.as_deref()
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One resolve/compare/synchronize pass. Errors never escape: they are
    /// folded into TickOutcome::Failed.
    pub fn tick(&mut self) -> TickOutcome {
        self.state = WatchState::Resolving;
        let outcome = self.tick_inner();
        self.state = WatchState::Idle;
        match outcome {
            TickOutcome::Failed(_) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            }
            _ => self.consecutive_failures = 0,
        }
        outcome
    }

    fn tick_inner(&mut self) -> TickOutcome {
        let target = match self.resolver.resolve(&self.reference) {
            Ok(id) => id,
            Err(e) => return TickOutcome::Failed(format!("{}", e)),
        };

        if self.running_version.as_deref() == Some(target.as_str()) {
            record_noop_tick();
            debug!("still at {}", target);
            return TickOutcome::NoChange;
        }
        info!("new version found: {}", target);

        self.state = WatchState::Synchronizing;
        let manifest = match self.loader.load(&target) {
            Ok(Some(m)) => m,
            Ok(None) => {
                return TickOutcome::Failed(format!("configuration for {} unavailable", target))
            }
            Err(e) => return TickOutcome::Failed(format!("{:#}", e)),
        };

        match self.sync.synchronize(&manifest, &target) {
            Ok(report) => {
                info!(
                    "'{}' converged on {} ({} fetched, {} skipped)",
                    manifest.name, target, report.fetched, report.skipped
                );
                self.running_version = Some(target.clone());
                TickOutcome::Synchronized(target)
            }
            Err(e) => TickOutcome::Failed(format!("{:#}", e)),
        }
    }

    /// Run until `stop` flips. Tick failures are logged and retried; the
    /// loop itself never terminates on error.
    pub fn run(&mut self, stop: &AtomicBool) {
        let mut sleep = self.interval;
        while !stop.load(Ordering::SeqCst) {
            match self.tick() {
                TickOutcome::Failed(msg) => {
                    if self.consecutive_failures >= self.fail_escalate_after {
                        error!(
                            "tick failed ({} in a row): {}",
                            self.consecutive_failures, msg
                        );
                        let cap = self
                            .interval
                            .saturating_mul(self.backoff_cap_ticks);
                        sleep = sleep.saturating_mul(2).min(cap);
                    } else {
                        warn!("tick failed: {}", msg);
                        sleep = self.interval;
                    }
                }
                _ => sleep = self.interval,
            }
            sleep_with_stop(sleep, stop);
        }
    }
}

// Sleep in small slices so a stop request stays responsive.
fn sleep_with_stop(total: Duration, stop: &AtomicBool) {
    let slice = Duration::from_millis(100);
    let mut left = total;
    while left > Duration::ZERO && !stop.load(Ordering::SeqCst) {
        let d = left.min(slice);
        thread::sleep(d);
        left = left.saturating_sub(d);
    }
}
