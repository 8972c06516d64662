#![allow(dead_code)]

use chrono::{Duration, Utc};
use recollect::config::RecollectConfig;
use recollect::memory::types::{Record, StoreKind};
use recollect::memory::Store;
use tempfile::TempDir;

/// Default configuration with both snapshots inside `tmp`.
pub fn test_config(tmp: &TempDir) -> RecollectConfig {
    let mut config = RecollectConfig::default();
    config.storage.memory_snapshot = tmp.path().join("memory.json").to_string_lossy().into_owned();
    config.storage.knowledge_snapshot =
        tmp.path().join("knowledge.json").to_string_lossy().into_owned();
    config
}

pub fn memory_store(tmp: &TempDir) -> Store {
    Store::open(&test_config(tmp), StoreKind::Memory).unwrap()
}

pub fn knowledge_store(tmp: &TempDir) -> Store {
    Store::open(&test_config(tmp), StoreKind::Knowledge).unwrap()
}

/// A record created `age_days` ago with the given usage history.
pub fn aged_record(content: &str, importance: f64, age_days: i64, access_count: u32) -> Record {
    let mut record = Record::new(content, "test", "general", importance);
    record.created_at = Utc::now() - Duration::days(age_days);
    record.access_count = access_count;
    record
}
