use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use MirrorDB::net::ContentClient;
use MirrorDB::{ConfigurationLoader, FsPageStore, FsSyncState};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("mdtest-{prefix}-{pid}-{t}-{id}"))
}

#[derive(Default)]
struct FakeContent {
    objects: Mutex<HashMap<String, Value>>,
}

impl FakeContent {
    fn put_object(&self, id: &str, v: Value) {
        self.objects.lock().unwrap().insert(id.to_string(), v);
    }
}

impl ContentClient for FakeContent {
    fn get_object(&self, id: &str) -> Result<Value> {
        self.objects
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("no object {}", id))
    }
    fn get_block(&self, fpr: &str) -> Result<Vec<u8>> {
        Err(anyhow!("no blocks here: {}", fpr))
    }
}

fn loader(root: &PathBuf, content: Arc<FakeContent>) -> ConfigurationLoader {
    let pages = Arc::new(FsPageStore::new(root));
    let state = Arc::new(FsSyncState::new(root));
    ConfigurationLoader::new(content, pages, state)
}

#[test]
fn two_stage_load_normalizes_mixed_link_shapes() {
    let root = unique_root("loader");
    fs::create_dir_all(&root).expect("create root");

    let content = Arc::new(FakeContent::default());
    content.put_object("snap", json!({"Versions": {"Current": {"Hash": "m1"}}}));
    content.put_object(
        "m1",
        json!({
            "Name": "db",
            "Links": [
                {"Cid": {"/": "fp-a"}},
                {"Hash": "fp-b"},
                {"/": "fp-c"},
                "fp-d",
            ],
        }),
    );

    let l = loader(&root, content);
    let m = l.load("snap").expect("load").expect("manifest");
    assert_eq!(m.name, "db");
    assert_eq!(m.page_fingerprints, vec!["fp-a", "fp-b", "fp-c", "fp-d"]);
    assert_eq!(m.total_pages(), 4);
}

#[test]
fn missing_version_index_is_unavailable_not_fatal() {
    let root = unique_root("loader-noidx");
    fs::create_dir_all(&root).expect("create root");

    let l = loader(&root, Arc::new(FakeContent::default()));
    let got = l.load("snap").expect("load must not crash");
    assert!(got.is_none());
}

#[test]
fn missing_manifest_object_is_unavailable_not_fatal() {
    let root = unique_root("loader-nomanifest");
    fs::create_dir_all(&root).expect("create root");

    let content = Arc::new(FakeContent::default());
    content.put_object("snap", json!({"Versions": {"Current": {"/": "m1"}}}));
    // m1 itself never published

    let l = loader(&root, content);
    let got = l.load("snap").expect("load must not crash");
    assert!(got.is_none());
}

#[test]
fn unexpected_shapes_are_unavailable_not_fatal() {
    let root = unique_root("loader-badshape");
    fs::create_dir_all(&root).expect("create root");

    let content = Arc::new(FakeContent::default());
    // index without Versions
    content.put_object("snap", json!({"versions?": 1}));
    let l = loader(&root, content.clone());
    assert!(l.load("snap").expect("load").is_none());

    // manifest without Links
    content.put_object("snap2", json!({"Versions": {"Current": {"/": "m2"}}}));
    content.put_object("m2", json!({"Name": "db"}));
    assert!(l.load("snap2").expect("load").is_none());
}

#[test]
fn first_load_provisions_namespaces_idempotently() {
    let root = unique_root("loader-prov");
    fs::create_dir_all(&root).expect("create root");

    let content = Arc::new(FakeContent::default());
    content.put_object("snap", json!({"Versions": {"Current": {"/": "m1"}}}));
    content.put_object("m1", json!({"Name": "db", "Links": [{"Hash": "f0"}]}));

    let l = loader(&root, content);
    l.load("snap").expect("load").expect("manifest");
    assert!(root.join("db").join("pages").is_dir());
    assert!(root.join("db").join("state").is_dir());

    // repeat load: provisioning must not fail or duplicate anything
    l.load("snap").expect("load again").expect("manifest");
    assert!(root.join("db").join("pages").is_dir());
}
