mod helpers;

use helpers::{memory_store, test_config};
use recollect::memory::types::StoreKind;
use recollect::memory::Store;
use tempfile::TempDir;

fn populated(tmp: &TempDir) -> Store {
    let mut store = memory_store(tmp);
    for content in [
        "I love rust programming",
        "rust compiler errors are helpful",
        "I enjoy hiking in the mountains",
        "my cat is named Luna",
        "the weather in Bangalore is pleasant",
        "python programming is fun too",
    ] {
        store.insert(content, "test", None).unwrap();
    }
    store
}

#[test]
fn results_respect_the_relevance_floor() {
    let tmp = TempDir::new().unwrap();
    let mut store = populated(&tmp);
    let floor = store.profile().relevance_floor;

    let query = "rust programming";
    let raw = store.index().unwrap().similarities(query).unwrap();
    let above_floor = raw.iter().filter(|&&s| s >= floor).count();
    assert!(above_floor > 0);

    let response = store.retrieve(query, 5);
    assert_eq!(response.results.len(), above_floor.min(5));
    assert!(response.results.iter().all(|r| r.similarity >= floor));
    assert!(response
        .results
        .windows(2)
        .all(|pair| pair[0].similarity >= pair[1].similarity));
    assert_eq!(response.results[0].content, "I love rust programming");
}

#[test]
fn k_caps_the_result_count() {
    let tmp = TempDir::new().unwrap();
    let mut store = populated(&tmp);
    let response = store.retrieve("rust programming", 1);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.total_scored, 6);
}

#[test]
fn only_returned_records_are_touched() {
    let tmp = TempDir::new().unwrap();
    let mut store = memory_store(&tmp);
    let first = store.insert("rust compiler errors", "test", None).unwrap().id;
    let second = store.insert("rust compiler errors", "test", None).unwrap().id;
    let other = store.insert("hiking boots", "test", None).unwrap().id;

    // equal similarity: the earlier record wins the single slot
    let response = store.retrieve("rust compiler errors", 1);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, first);

    assert_eq!(store.get(&first).unwrap().access_count, 1);
    assert!(store.get(&first).unwrap().last_accessed.is_some());
    assert_eq!(store.get(&second).unwrap().access_count, 0);
    assert!(store.get(&second).unwrap().last_accessed.is_none());
    assert_eq!(store.get(&other).unwrap().access_count, 0);
}

#[test]
fn repeated_hits_accumulate() {
    let tmp = TempDir::new().unwrap();
    let mut store = populated(&tmp);
    for _ in 0..3 {
        store.retrieve("hiking mountains", 1);
    }
    let hiked = store
        .records()
        .iter()
        .find(|r| r.content.contains("hiking"))
        .unwrap();
    assert_eq!(hiked.access_count, 3);
}

#[test]
fn rebuilding_twice_gives_identical_scores() {
    let tmp = TempDir::new().unwrap();
    let mut store = populated(&tmp);

    store.rebuild_index();
    let first = store.index().unwrap().similarities("rust compiler").unwrap();
    store.rebuild_index();
    let second = store.index().unwrap().similarities("rust compiler").unwrap();
    assert_eq!(first, second);
}

#[test]
fn access_statistics_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let id = {
        let mut store = populated(&tmp);
        let response = store.retrieve("weather Bangalore", 1);
        response.results[0].id.clone()
    };

    let reopened = Store::open(&test_config(&tmp), StoreKind::Memory).unwrap();
    let record = reopened.get(&id).unwrap();
    assert_eq!(record.access_count, 1);
    assert!(record.last_accessed.is_some());
}

#[test]
fn misses_leave_the_snapshot_alone() {
    let tmp = TempDir::new().unwrap();
    let mut store = populated(&tmp);
    let before = std::fs::read_to_string(store.snapshot_path()).unwrap();

    let response = store.retrieve("quantum chromodynamics", 5);
    assert!(response.results.is_empty());

    let after = std::fs::read_to_string(store.snapshot_path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn a_hit_exactly_at_the_floor_is_kept() {
    let tmp = TempDir::new().unwrap();
    let query = "rust programming";
    let exact = {
        let store = populated(&tmp);
        let raw = store.index().unwrap().similarities(query).unwrap();
        raw.into_iter().filter(|&s| s > 0.0 && s < 1.0).fold(0.0, f64::max)
    };
    assert!(exact > 0.0);

    let mut config = test_config(&tmp);
    config.memory.relevance_floor = exact;
    let mut at_floor = Store::open(&config, StoreKind::Memory).unwrap();
    let response = at_floor.retrieve(query, 5);
    assert!(response.results.iter().any(|r| r.similarity == exact));
    assert!(response.results.iter().all(|r| r.similarity >= exact));

    config.memory.relevance_floor = f64::from_bits(exact.to_bits() + 1);
    let mut above = Store::open(&config, StoreKind::Memory).unwrap();
    let response = above.retrieve(query, 5);
    assert!(response.results.iter().all(|r| r.similarity > exact));
}
