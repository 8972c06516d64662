//! File snapshots of a store's full record collection.
//!
//! One JSON file per store, rewritten in full after every mutation. Writes go
//! to `<path>.tmp` and are renamed over the target. There is no locking:
//! several processes sharing a path are last-writer-wins.
//!
//! Every snapshot carries a `version` tag. Files without one, or with a
//! version newer than [`CURRENT_SNAPSHOT_VERSION`], are refused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::memory::types::{Record, StoreKind};

/// The snapshot version that the current binary writes.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub version: u32,
    pub kind: StoreKind,
    pub saved_at: DateTime<Utc>,
    pub records: Vec<Record>,
}

/// Serialize `records` for `kind` as a current-version snapshot document.
pub fn to_json(kind: StoreKind, records: &[Record]) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        version: u32,
        kind: StoreKind,
        saved_at: DateTime<Utc>,
        records: &'a [Record],
    }

    serde_json::to_string_pretty(&SnapshotRef {
        version: CURRENT_SNAPSHOT_VERSION,
        kind,
        saved_at: Utc::now(),
        records,
    })
}

/// Version tag of a raw snapshot document.
pub fn snapshot_version(doc: &serde_json::Value) -> Result<u32, String> {
    let tag = doc.get("version").ok_or("snapshot has no version tag")?;
    tag.as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| format!("invalid snapshot version: {tag}"))
}

fn check_version(doc: &serde_json::Value) -> Result<(), String> {
    let version = snapshot_version(doc)?;
    if version > CURRENT_SNAPSHOT_VERSION {
        return Err(format!(
            "snapshot version {version} is newer than supported version {CURRENT_SNAPSHOT_VERSION}"
        ));
    }
    if version == 0 {
        return Err("snapshot version 0 is not a valid version".into());
    }
    Ok(())
}

/// Parse a snapshot document into records for `kind`.
///
/// `path` is used for error messages only.
pub fn parse(contents: &str, kind: StoreKind, path: &Path) -> Result<Vec<Record>, StoreError> {
    let unusable = |reason: String| StoreError::Snapshot {
        path: path.to_path_buf(),
        reason,
    };

    let raw: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| unusable(format!("invalid JSON: {e}")))?;
    check_version(&raw).map_err(unusable)?;
    let file: SnapshotFile =
        serde_json::from_value(raw).map_err(|e| unusable(format!("bad layout: {e}")))?;

    if file.kind != kind {
        return Err(unusable(format!(
            "snapshot belongs to the {} store, not {kind}",
            file.kind
        )));
    }
    for record in &file.records {
        record.validate().map_err(unusable)?;
    }
    Ok(file.records)
}

/// Write the full collection to `path`, replacing any previous snapshot.
pub fn save(path: &Path, kind: StoreKind, records: &[Record]) -> Result<(), StoreError> {
    let io_err = |action: &'static str, source: std::io::Error| StoreError::Persistence {
        action,
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create directory", e))?;
    }

    let json = to_json(kind, records).map_err(|e| StoreError::Snapshot {
        path: path.to_path_buf(),
        reason: format!("serialization failed: {e}"),
    })?;

    let tmp_path = tmp_path(path);
    std::fs::write(&tmp_path, json).map_err(|e| io_err("write", e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err("rename", e));
    }

    tracing::debug!(path = %path.display(), records = records.len(), store = %kind, "snapshot saved");
    Ok(())
}

/// Read the snapshot at `path`. `Ok(None)` when no file exists.
pub fn load(path: &Path, kind: StoreKind) -> Result<Option<Vec<Record>>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Persistence {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, kind, path).map(Some)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Snapshot diagnostics for the `doctor` command.
#[derive(Debug, Serialize)]
pub struct SnapshotHealth {
    pub exists: bool,
    pub size_bytes: u64,
    pub version: Option<u32>,
    pub record_count: Option<usize>,
    pub readable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inspect the snapshot at `path` without modifying it.
pub fn check_snapshot_health(path: &Path, kind: StoreKind) -> SnapshotHealth {
    let mut health = SnapshotHealth {
        exists: path.exists(),
        size_bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        version: None,
        record_count: None,
        readable: false,
        error: None,
    };
    if !health.exists {
        return health;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            health.error = Some(e.to_string());
            return health;
        }
    };
    health.version = serde_json::from_str::<serde_json::Value>(&contents)
        .ok()
        .and_then(|doc| snapshot_version(&doc).ok());

    match parse(&contents, kind, path) {
        Ok(records) => {
            health.readable = true;
            health.record_count = Some(records.len());
        }
        Err(e) => health.error = Some(e.to_string()),
    }
    health
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("I live in Bangalore", "user_statement", "personal", 0.9),
            Record::new("I like Python", "user_statement", "preferences", 0.7),
        ]
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("memory.json");
        let records = sample();

        save(&path, StoreKind::Memory, &records).unwrap();
        let loaded = load(&path, StoreKind::Memory).unwrap().unwrap();
        assert_eq!(loaded, records);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load(&tmp.path().join("none.json"), StoreKind::Memory).unwrap().is_none());
    }

    #[test]
    fn garbage_is_a_snapshot_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        std::fs::write(&path, "not json at all").unwrap();
        let err = load(&path, StoreKind::Memory).unwrap_err();
        assert!(matches!(err, StoreError::Snapshot { .. }));
    }

    #[test]
    fn wrong_store_kind_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        save(&path, StoreKind::Memory, &sample()).unwrap();
        assert!(load(&path, StoreKind::Knowledge).is_err());
    }

    #[test]
    fn version_tag_is_required() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        std::fs::write(&path, r#"{"memories": [{"content": "untagged"}]}"#).unwrap();
        let err = load(&path, StoreKind::Memory).unwrap_err();
        assert!(err.to_string().contains("no version tag"));
    }

    #[test]
    fn future_version_is_rejected() {
        let doc = serde_json::json!({"version": 99});
        assert!(check_version(&doc).unwrap_err().contains("newer"));
        assert!(check_version(&serde_json::json!({"version": 0})).is_err());
        assert!(check_version(&serde_json::json!({"version": "one"})).is_err());
        assert!(check_version(&serde_json::json!({"version": 1})).is_ok());
    }

    #[test]
    fn out_of_range_importance_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        let mut records = sample();
        records[0].importance = 3.0;
        save(&path, StoreKind::Memory, &records).unwrap();
        assert!(load(&path, StoreKind::Memory).is_err());
    }

    #[test]
    fn saving_onto_a_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let err = save(tmp.path(), StoreKind::Memory, &sample()).unwrap_err();
        assert!(matches!(err, StoreError::Persistence { action: "rename", .. }));
    }

    #[test]
    fn health_reports_counts_and_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");

        let health = check_snapshot_health(&path, StoreKind::Memory);
        assert!(!health.exists);
        assert!(!health.readable);

        save(&path, StoreKind::Memory, &sample()).unwrap();
        let health = check_snapshot_health(&path, StoreKind::Memory);
        assert!(health.readable);
        assert_eq!(health.version, Some(CURRENT_SNAPSHOT_VERSION));
        assert_eq!(health.record_count, Some(2));
        assert!(health.size_bytes > 0);

        std::fs::write(&path, "{").unwrap();
        let health = check_snapshot_health(&path, StoreKind::Memory);
        assert!(health.exists);
        assert!(!health.readable);
        assert!(health.error.is_some());
    }
}
