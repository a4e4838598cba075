//! manifest — snapshot manifests and the wire shapes they are read from.
//!
//! Wire objects (fixed, external):
//! - version index: {"Versions": {"Current": <link>}}
//! - manifest:      {"Name": <string>, "Links": [<link>, ...]}
//!
//! Array position in Links IS the page number: fingerprints are ordered,
//! contiguous, zero-based, one per page, no gaps, no renumbering.
//!
//! A <link> appears in several encodings across publishers. Normalization
//! into a plain fingerprint string happens here, in one tagged union, so
//! the synchronizer only ever sees the Manifest shape.

use serde::Deserialize;

/// Ordered per-page fingerprints for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Database name; also the local namespace for PageStore/SyncState.
    pub name: String,
    /// Index is the page number.
    pub page_fingerprints: Vec<String>,
}

impl Manifest {
    pub fn total_pages(&self) -> u64 {
        self.page_fingerprints.len() as u64
    }
}

/// One page link as found on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireLink {
    /// {"Cid": {"/": "<fingerprint>"}}
    Cid {
        #[serde(rename = "Cid")]
        cid: CidRef,
    },
    /// {"Hash": "<fingerprint>"}
    Hash {
        #[serde(rename = "Hash")]
        hash: String,
    },
    /// {"/": "<fingerprint>"}
    Slash {
        #[serde(rename = "/")]
        fingerprint: String,
    },
    /// "<fingerprint>"
    Plain(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CidRef {
    #[serde(rename = "/")]
    pub fingerprint: String,
}

impl WireLink {
    pub fn fingerprint(&self) -> &str {
        match self {
            WireLink::Cid { cid } => &cid.fingerprint,
            WireLink::Hash { hash } => hash,
            WireLink::Slash { fingerprint } => fingerprint,
            WireLink::Plain(s) => s,
        }
    }
}

/// {"Versions": {"Current": <link>}}: points at the active manifest.
#[derive(Debug, Deserialize)]
pub struct WireVersionIndex {
    #[serde(rename = "Versions")]
    pub versions: WireVersions,
}

#[derive(Debug, Deserialize)]
pub struct WireVersions {
    #[serde(rename = "Current")]
    pub current: WireLink,
}

/// The manifest object as published. Lowercase field aliases are accepted:
/// some publishers emit "links"/"name".
#[derive(Debug, Deserialize)]
pub struct WireManifest {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Links", alias = "links")]
    pub links: Vec<WireLink>,
}

impl WireManifest {
    pub fn normalize(self) -> Manifest {
        Manifest {
            name: self.name,
            page_fingerprints: self
                .links
                .iter()
                .map(|l| l.fingerprint().to_string())
                .collect(),
        }
    }
}

pub mod loader;

pub use loader::ConfigurationLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_shapes_all_normalize() {
        let v = serde_json::json!([
            {"Cid": {"/": "fp-a"}},
            {"Hash": "fp-b"},
            {"/": "fp-c"},
            "fp-d",
        ]);
        let links: Vec<WireLink> = serde_json::from_value(v).expect("parse links");
        let got: Vec<&str> = links.iter().map(|l| l.fingerprint()).collect();
        assert_eq!(got, vec!["fp-a", "fp-b", "fp-c", "fp-d"]);
    }

    #[test]
    fn manifest_accepts_lowercase_aliases() {
        let v = serde_json::json!({"name": "db", "links": [{"Hash": "f0"}]});
        let wire: WireManifest = serde_json::from_value(v).expect("parse manifest");
        let m = wire.normalize();
        assert_eq!(m.name, "db");
        assert_eq!(m.page_fingerprints, vec!["f0".to_string()]);
        assert_eq!(m.total_pages(), 1);
    }
}
