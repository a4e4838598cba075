use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};

use MirrorDB::errors::ResolveError;
use MirrorDB::net::{NameService, ResolvedName};
use MirrorDB::{SnapshotRef, VersionResolver};

struct CountingNames {
    target: String,
    calls: AtomicUsize,
    fail: bool,
}

impl CountingNames {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }
    fn failing() -> Self {
        Self {
            target: String::new(),
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NameService for CountingNames {
    fn resolve(&self, _name: &str) -> Result<ResolvedName> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("lookup timed out"));
        }
        Ok(ResolvedName {
            target: self.target.clone(),
            as_of: 0,
        })
    }
}

#[test]
fn parse_accepts_both_protocols() {
    assert_eq!(
        SnapshotRef::parse("/ipns/some-key").expect("mutable"),
        SnapshotRef::Mutable("some-key".to_string())
    );
    assert_eq!(
        SnapshotRef::parse("/ipfs/bafy123").expect("immutable"),
        SnapshotRef::Immutable("bafy123".to_string())
    );
    // trailing path segments are tolerated
    assert_eq!(
        SnapshotRef::parse("/ipfs/bafy123/extra").expect("with path"),
        SnapshotRef::Immutable("bafy123".to_string())
    );
}

#[test]
fn parse_rejects_malformed_references() {
    for bad in ["", "ipfs/bafy", "/http/x", "/ipns/", "/ipfs", "bafy123"] {
        let err = SnapshotRef::parse(bad).expect_err("must be malformed");
        assert!(matches!(err, ResolveError::Malformed(_)), "input: {bad:?}");
        assert!(!err.is_transient());
    }
}

#[test]
fn immutable_reference_never_hits_the_name_service() {
    let names = Arc::new(CountingNames::new("whatever"));
    let resolver = VersionResolver::new(names.clone(), 15);

    let r = SnapshotRef::parse("/ipfs/bafy123").expect("parse");
    assert_eq!(resolver.resolve(&r).expect("resolve"), "bafy123");
    assert_eq!(names.calls(), 0);
}

#[test]
fn bucketed_cache_bounds_lookup_rate() {
    let names = Arc::new(CountingNames::new("snap-1"));
    // one-hour buckets: both resolves land in the same bucket
    let resolver = VersionResolver::new(names.clone(), 3600);

    let r = SnapshotRef::parse("/ipns/key").expect("parse");
    assert_eq!(resolver.resolve(&r).expect("first"), "snap-1");
    assert_eq!(resolver.resolve(&r).expect("second"), "snap-1");
    assert_eq!(names.calls(), 1, "second resolve must come from the memo");
}

#[test]
fn zero_bucket_disables_the_cache() {
    let names = Arc::new(CountingNames::new("snap-1"));
    let resolver = VersionResolver::new(names.clone(), 0);

    let r = SnapshotRef::parse("/ipns/key").expect("parse");
    resolver.resolve(&r).expect("first");
    resolver.resolve(&r).expect("second");
    assert_eq!(names.calls(), 2);
}

#[test]
fn lookup_failure_maps_to_transient_unavailable() {
    let names = Arc::new(CountingNames::failing());
    let resolver = VersionResolver::new(names, 15);

    let r = SnapshotRef::parse("/ipns/key").expect("parse");
    let err = resolver.resolve(&r).expect_err("must fail");
    assert!(matches!(err, ResolveError::Unavailable { .. }));
    assert!(err.is_transient());
}
