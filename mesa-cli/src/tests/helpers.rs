//! Test helpers for writing request files into a scratch directory.

use camino::Utf8PathBuf;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// A temporary directory addressed with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }

    pub(super) fn write_json(&self, name: &str, value: &Value) -> Utf8PathBuf {
        let payload = serde_json::to_vec_pretty(value).expect("serialize request");
        self.write(name, &payload)
    }
}

/// One colleague in Lima scoring KFC San Isidro (score 78).
pub(super) fn lima_request(group_id: u64) -> Value {
    json!({
        "groupId": group_id,
        "members": [
            { "id": 1, "name": "Ana", "address": { "lat": -12.0, "lng": -77.0 } }
        ],
        "venue": {
            "id": 1,
            "name": "KFC - San Isidro",
            "address": { "lat": -12.0904, "lng": -77.0396 }
        }
    })
}

/// Two colleagues choosing between the three Lima KFC locations.
pub(super) fn lima_ranking_request() -> Value {
    json!({
        "groupId": 3,
        "members": [
            { "id": 1, "name": "Ana", "address": { "lat": -12.0464, "lng": -77.0428 } },
            { "id": 2, "name": "Rosa", "address": { "lat": -12.05, "lng": -77.03 } }
        ],
        "venues": [
            { "id": 1, "name": "KFC - San Isidro", "address": { "lat": -12.0904, "lng": -77.0396 } },
            { "id": 2, "name": "KFC - Miraflores", "address": { "lat": -12.1265, "lng": -77.0305 } },
            { "id": 3, "name": "KFC - Centro Histórico", "address": { "lat": -12.0469, "lng": -77.0289 } },
            { "id": 4, "name": "Pop-up", "address": null }
        ]
    })
}

pub(super) fn stdout_text(buffer: &[u8]) -> String {
    String::from_utf8(buffer.to_vec()).expect("stdout utf-8")
}
