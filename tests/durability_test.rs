mod helpers;

use helpers::{knowledge_store, memory_store, test_config};
use recollect::memory::types::StoreKind;
use recollect::memory::Store;
use recollect::snapshot;
use tempfile::TempDir;

#[test]
fn records_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let ids: Vec<String> = {
        let mut store = memory_store(&tmp);
        ["I live in Bangalore", "I like green tea", "I work on compilers"]
            .iter()
            .map(|c| store.insert(c, "user_statement", None).unwrap().id)
            .collect()
    };

    let store = memory_store(&tmp);
    assert_eq!(store.len(), 3);
    let reopened: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(reopened, ids.iter().map(String::as_str).collect::<Vec<_>>());

    let record = store.get(&ids[0]).unwrap();
    assert_eq!(record.content, "I live in Bangalore");
    assert_eq!(record.category, "personal");
    assert!((record.importance - 0.9).abs() < 1e-12);
    assert!(store.index().is_some());
}

#[test]
fn snapshot_is_versioned_json() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);
    store.insert("I like green tea", "user_statement", None).unwrap();

    let raw = std::fs::read_to_string(store.snapshot_path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["kind"], "memory");
    assert_eq!(doc["records"].as_array().unwrap().len(), 1);
    assert!(!tmp.path().join("memory.json.tmp").exists());
}

#[test]
fn garbage_snapshots_cold_start() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("memory.json"), "not json at all").unwrap();
    std::fs::write(tmp.path().join("knowledge.json"), "{\"version\": 1, \"kind\": ").unwrap();

    let memory = memory_store(&tmp);
    assert!(memory.is_empty());

    let knowledge = knowledge_store(&tmp);
    assert_eq!(knowledge.len(), 5);
    // the seeded collection replaces the broken file
    let health = snapshot::check_snapshot_health(knowledge.snapshot_path(), StoreKind::Knowledge);
    assert!(health.readable);
    assert_eq!(health.record_count, Some(5));
}

#[test]
fn snapshot_of_the_other_kind_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let knowledge = knowledge_store(&tmp);
    std::fs::copy(knowledge.snapshot_path(), tmp.path().join("memory.json")).unwrap();

    let memory = memory_store(&tmp);
    assert!(memory.is_empty());
}

#[test]
fn failed_write_keeps_in_memory_state() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(&tmp);
    let blocked = tmp.path().join("blocked");
    std::fs::create_dir(&blocked).unwrap();
    config.storage.memory_snapshot = blocked.to_string_lossy().into_owned();

    let mut store = Store::open(&config, StoreKind::Memory).unwrap();
    assert!(store.is_empty());

    let result = store.insert("I like green tea", "user_statement", None).unwrap();
    assert!(!result.persisted);
    assert_eq!(store.len(), 1);
    assert_eq!(store.retrieve("green tea", 5).results.len(), 1);
    assert!(!tmp.path().join("blocked.tmp").exists());
}

#[test]
fn untagged_snapshot_is_a_cold_start() {
    let tmp = TempDir::new().unwrap();
    let untagged = serde_json::json!({
        "memories": [{"content": "My name is Mann Gupta", "importance": 0.9}]
    });
    let path = tmp.path().join("memory.json");
    std::fs::write(&path, untagged.to_string()).unwrap();

    let health = snapshot::check_snapshot_health(&path, StoreKind::Memory);
    assert!(!health.readable);
    assert_eq!(health.version, None);

    let mut store = memory_store(&tmp);
    assert!(store.is_empty());
    // the file is left alone until the next write replaces it
    assert!(std::fs::read_to_string(&path).unwrap().contains("memories"));
    store.insert("I work remotely", "user_statement", None).unwrap();
    let health = snapshot::check_snapshot_health(&path, StoreKind::Memory);
    assert_eq!(health.version, Some(1));
    assert_eq!(health.record_count, Some(1));
}

#[test]
fn future_snapshot_versions_are_not_loaded() {
    let tmp = TempDir::new().unwrap();
    let future = serde_json::json!({
        "version": 99,
        "kind": "memory",
        "saved_at": "2030-01-01T00:00:00Z",
        "records": []
    });
    std::fs::write(tmp.path().join("memory.json"), future.to_string()).unwrap();

    let health = snapshot::check_snapshot_health(&tmp.path().join("memory.json"), StoreKind::Memory);
    assert!(!health.readable);
    assert_eq!(health.version, Some(99));
    assert!(memory_store(&tmp).is_empty());
}
