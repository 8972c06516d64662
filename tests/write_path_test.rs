mod helpers;

use helpers::{knowledge_store, memory_store};
use recollect::error::StoreError;
use recollect::memory::store::USER_STATEMENT;
use tempfile::TempDir;

#[test]
fn observe_stores_only_triggered_text() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);

    assert!(store.observe("the sky is blue today").unwrap().is_none());
    assert!(store.is_empty());

    let stored = store.observe("Remember that I prefer tabs").unwrap().unwrap();
    let record = store.get(&stored.id).unwrap();
    assert_eq!(record.provenance, USER_STATEMENT);
    assert_eq!(record.category, "preferences");
}

#[test]
fn observe_is_memory_only() {
    let tmp = TempDir::new().unwrap();
    let mut store = knowledge_store(&tmp);
    let err = store.observe("remember this").unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn add_explicit_is_knowledge_only() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);
    let err = store
        .add_explicit(Some("Title"), "content", None, Vec::new())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn importance_is_clamped_to_one() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);
    let result = store
        .insert(
            "My name is Mann Gupta and I live in Bangalore, writing python programming tutorials",
            USER_STATEMENT,
            None,
        )
        .unwrap();
    assert_eq!(result.importance, 1.0);
    assert_eq!(result.category, "personal");
}

#[test]
fn category_ties_go_to_the_earlier_entry() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);
    // one "work" hit (job) and one "preferences" hit (like)
    let result = store.insert("I like my job", USER_STATEMENT, None).unwrap();
    assert_eq!(result.category, "work");
    assert_eq!(result.importance, 0.5);
}

#[test]
fn invalid_input_is_rejected_without_side_effects() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);

    let err = store.insert("   ", USER_STATEMENT, None).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let err = store.insert("valid text", USER_STATEMENT, Some(1.5)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    assert!(store.is_empty());
    assert!(!store.snapshot_path().exists());
}

#[test]
fn index_tracks_every_insert() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);
    for i in 0..4 {
        store.insert(&format!("project alpha milestone {i}"), USER_STATEMENT, None).unwrap();
        assert_eq!(store.index().unwrap().len(), i + 1);
    }
}
