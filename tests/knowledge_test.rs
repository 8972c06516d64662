mod helpers;

use helpers::{knowledge_store, memory_store, test_config};
use recollect::error::StoreError;
use recollect::memory::seed::SEED;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;
use recollect::snapshot;
use tempfile::TempDir;

/// Sixty distinct words, so any single shared word is a weak match.
fn long_rare_document() -> String {
    let letters: Vec<char> = ('a'..='z').collect();
    (0..60)
        .map(|i| format!("zx{}{}", letters[i / 26], letters[i % 26]))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn cold_start_seeds_and_persists() {
    let tmp = TempDir::new().unwrap();
    let store = knowledge_store(&tmp);

    assert_eq!(store.len(), 5);
    assert!(store.records().iter().all(|r| r.provenance == SEED));
    assert!(store.records().iter().all(|r| r.importance == 0.5));
    assert!(store.snapshot_path().exists());

    let index = store.index().unwrap();
    assert!(index.is_reduced());
    assert!(index.dimensions() <= 5);
}

#[test]
fn seed_is_applied_once() {
    let tmp = TempDir::new().unwrap();
    let ids: Vec<String> = knowledge_store(&tmp).records().iter().map(|r| r.id.clone()).collect();
    let reopened: Vec<String> = knowledge_store(&tmp).records().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, reopened);
}

#[test]
fn python_query_finds_the_python_document() {
    let tmp = TempDir::new().unwrap();
    let mut store = knowledge_store(&tmp);

    let response = store.retrieve("python programming language", 3);
    assert!(!response.results.is_empty());
    assert_eq!(response.results[0].title.as_deref(), Some("Python Programming Basics"));
    assert!(response.results.iter().all(|r| r.similarity >= 0.05));
}

#[test]
fn curated_documents_are_searchable() {
    let tmp = TempDir::new().unwrap();
    let mut store = knowledge_store(&tmp);

    let added = store
        .add_explicit(
            Some("Rust Ownership"),
            "Rust enforces memory safety through ownership and the borrow checker, \
             without needing a garbage collector.",
            None,
            vec!["rust".into()],
        )
        .unwrap();
    assert!(added.persisted);
    assert_eq!(store.len(), 6);

    let response = store.retrieve("borrow checker ownership", 3);
    assert_eq!(response.results[0].id, added.id);
    assert_eq!(response.results[0].title.as_deref(), Some("Rust Ownership"));
    assert_eq!(response.results[0].tags, vec!["rust".to_string()]);
    assert_eq!(response.results[0].provenance, "curated");
}

#[test]
fn explicit_category_is_validated() {
    let tmp = TempDir::new().unwrap();
    let mut store = knowledge_store(&tmp);

    let ok = store
        .add_explicit(None, "Notes on unit testing", Some("software"), Vec::new())
        .unwrap();
    assert_eq!(ok.category, "software");

    let err = store
        .add_explicit(None, "Notes on cooking", Some("recipes"), Vec::new())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert_eq!(store.len(), 6);
}

#[test]
fn category_is_inferred_from_title_and_content() {
    let tmp = TempDir::new().unwrap();
    let mut store = knowledge_store(&tmp);
    let added = store
        .add_explicit(Some("Deep learning"), "Stacked layers of units.", None, Vec::new())
        .unwrap();
    assert_eq!(added.category, "ai");
}

#[test]
fn empty_snapshot_is_reseeded() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("knowledge.json");
    std::fs::write(&path, snapshot::to_json(StoreKind::Knowledge, &[]).unwrap()).unwrap();

    let store = knowledge_store(&tmp);
    assert_eq!(store.len(), 5);
    assert!(store.records().iter().all(|r| r.provenance == SEED));
    let health = snapshot::check_snapshot_health(&path, StoreKind::Knowledge);
    assert_eq!(health.record_count, Some(5));
}

#[test]
fn a_hit_exactly_at_the_floor_is_kept() {
    let tmp = TempDir::new().unwrap();
    let query = "python programming";
    let exact = {
        let store = knowledge_store(&tmp);
        let raw = store.index().unwrap().similarities(query).unwrap();
        raw.into_iter().filter(|&s| s > 0.0 && s < 1.0).fold(0.0, f64::max)
    };
    assert!(exact > 0.0);

    let mut config = test_config(&tmp);
    config.knowledge.relevance_floor = exact;
    let mut at_floor = Store::open(&config, StoreKind::Knowledge).unwrap();
    let response = at_floor.retrieve(query, 5);
    assert!(response.results.iter().any(|r| r.similarity == exact));

    config.knowledge.relevance_floor = f64::from_bits(exact.to_bits() + 1);
    let mut above = Store::open(&config, StoreKind::Knowledge).unwrap();
    let response = above.retrieve(query, 5);
    assert!(response.results.iter().all(|r| r.similarity > exact));
}

#[test]
fn weak_hits_survive_the_lower_knowledge_floor() {
    let long = long_rare_document();
    let query = "zxaa quasar";

    let knowledge_dir = TempDir::new().unwrap();
    let mut knowledge = knowledge_store(&knowledge_dir);
    let weak = knowledge.add_explicit(None, &long, None, vec![]).unwrap().id;
    let strong = knowledge.add_explicit(None, "quasar", None, vec![]).unwrap().id;

    let response = knowledge.retrieve(query, 5);
    let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![strong.as_str(), weak.as_str()]);
    let similarity = response.results[1].similarity;
    assert!((0.05..0.1).contains(&similarity), "similarity {similarity}");

    let memory_dir = TempDir::new().unwrap();
    let mut memory = memory_store(&memory_dir);
    let weak = memory.insert(&long, "test", None).unwrap().id;
    let strong = memory.insert("quasar", "test", None).unwrap().id;

    let raw = memory.index().unwrap().similarities(query).unwrap();
    assert!(raw[0] > 0.0 && raw[0] < 0.1, "similarity {}", raw[0]);

    let response = memory.retrieve(query, 5);
    let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![strong.as_str()]);
    assert!(memory.get(&weak).unwrap().last_accessed.is_none());
}
