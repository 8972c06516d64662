//! Write path: open, insert, curate, import, and index upkeep.
//!
//! [`Store`] owns one record collection and the index derived from it. Every
//! mutation runs the same pipeline: validate → score/categorize → append →
//! enforce capacity → rebuild the index over all records → snapshot.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{RecollectConfig, RetentionConfig, StoreProfile};
use crate::error::{StoreError, StoreResult};
use crate::index::CorpusIndex;
use crate::memory::scoring::Scorer;
use crate::memory::seed;
use crate::memory::types::{Record, StoreKind};
use crate::snapshot;

/// Provenance for statements captured by the storage trigger.
pub const USER_STATEMENT: &str = "user_statement";
/// Provenance for documents added through [`Store::add_explicit`].
pub const CURATED: &str = "curated";

/// Result returned from an insert.
#[derive(Debug, Clone, Serialize)]
pub struct InsertResult {
    pub id: String,
    pub category: String,
    pub importance: f64,
    /// `false` if the snapshot write failed; the record is still held in memory.
    pub persisted: bool,
    /// Number of records removed by the capacity check that followed.
    pub evicted: usize,
}

/// Result returned from a bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub imported: usize,
    /// Records whose id already existed.
    pub skipped: usize,
    pub evicted: usize,
    pub persisted: bool,
}

/// A memory or knowledge store. Single-writer; not shared across threads
/// without external locking.
#[derive(Debug)]
pub struct Store {
    pub(crate) profile: StoreProfile,
    pub(crate) scorer: Scorer,
    pub(crate) retention: RetentionConfig,
    pub(crate) path: PathBuf,
    pub(crate) records: Vec<Record>,
    /// Bumped on every change to the record set (not on access updates).
    pub(crate) revision: u64,
    pub(crate) index: Option<CorpusIndex>,
    /// Revision the current `index` was built for.
    pub(crate) indexed_revision: Option<u64>,
    /// Snapshot writes attempted since open.
    pub(crate) snapshot_writes: u64,
}

impl Store {
    /// Open the store of `kind` at its configured snapshot path.
    pub fn open(config: &RecollectConfig, kind: StoreKind) -> StoreResult<Self> {
        Self::open_at(config, kind, config.snapshot_path(kind))
    }

    /// Open the store of `kind` backed by the snapshot at `path`.
    ///
    /// Configuration errors abort. A missing or unreadable snapshot is a cold
    /// start: an empty memory store, or the built-in seed for knowledge. An
    /// empty knowledge snapshot is reseeded as well.
    pub fn open_at(
        config: &RecollectConfig,
        kind: StoreKind,
        path: impl AsRef<Path>,
    ) -> StoreResult<Self> {
        config.validate()?;
        let profile = config.profile(kind);
        let path = path.as_ref().to_path_buf();

        let mut store = Self {
            scorer: Scorer::new(&config.scoring, &profile.categories),
            retention: config.retention.clone(),
            profile,
            path,
            records: Vec::new(),
            revision: 0,
            index: None,
            indexed_revision: None,
            snapshot_writes: 0,
        };

        match snapshot::load(&store.path, kind) {
            Ok(Some(records)) if records.is_empty() && kind == StoreKind::Knowledge => {
                tracing::info!(path = %store.path.display(), "empty knowledge snapshot, cold start");
                store.cold_start();
            }
            Ok(Some(records)) => {
                tracing::info!(store = %kind, records = records.len(), path = %store.path.display(), "snapshot loaded");
                store.records = records;
                store.rebuild_index();
            }
            Ok(None) => {
                tracing::info!(store = %kind, path = %store.path.display(), "no snapshot, cold start");
                store.cold_start();
            }
            Err(e) => {
                tracing::warn!(store = %kind, error = %e, "snapshot unusable, cold start");
                store.cold_start();
            }
        }

        Ok(store)
    }

    fn cold_start(&mut self) {
        self.records = match self.kind() {
            StoreKind::Memory => Vec::new(),
            StoreKind::Knowledge => seed::seed_records(),
        };
        self.mark_changed();
        self.rebuild_index();

        if self.kind() == StoreKind::Knowledge {
            self.persist();
            tracing::info!(records = self.records.len(), "knowledge base seeded");
        }
    }

    pub fn kind(&self) -> StoreKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &StoreProfile {
        &self.profile
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The current index, if one could be built.
    pub fn index(&self) -> Option<&CorpusIndex> {
        self.index.as_ref()
    }

    /// Insert a record, scoring it when `importance` is `None`.
    pub fn insert(
        &mut self,
        content: &str,
        provenance: &str,
        importance: Option<f64>,
    ) -> StoreResult<InsertResult> {
        let content = require_content(content)?;
        let importance = match importance {
            Some(value) if !(0.0..=1.0).contains(&value) => {
                return Err(StoreError::InvalidInput(format!(
                    "importance must be between 0.0 and 1.0, got {value}"
                )));
            }
            Some(value) => value,
            None => self.scorer.score(content),
        };
        let category = self.scorer.categorize(content);

        let record = Record::new(content, provenance, category, importance);
        Ok(self.append(record))
    }

    /// Memory store only: insert `text` if it contains a storage trigger phrase.
    pub fn observe(&mut self, text: &str) -> StoreResult<Option<InsertResult>> {
        if self.kind() != StoreKind::Memory {
            return Err(StoreError::InvalidInput(
                "observe is only available on the memory store".into(),
            ));
        }
        if !self.should_store(text) {
            tracing::debug!(store = %self.kind(), "no storage trigger in text");
            return Ok(None);
        }
        self.insert(text, USER_STATEMENT, None).map(Some)
    }

    /// Whether `text` contains any configured trigger phrase.
    pub fn should_store(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.profile
            .triggers
            .iter()
            .any(|t| !t.is_empty() && lower.contains(&t.to_lowercase()))
    }

    /// Knowledge store only: curated insert with optional title, category, and tags.
    pub fn add_explicit(
        &mut self,
        title: Option<&str>,
        content: &str,
        category: Option<&str>,
        tags: Vec<String>,
    ) -> StoreResult<InsertResult> {
        if self.kind() != StoreKind::Knowledge {
            return Err(StoreError::InvalidInput(
                "add_explicit is only available on the knowledge store".into(),
            ));
        }
        let content = require_content(content)?;
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        let category = match category {
            Some(name) if self.scorer.has_category(name) => name.to_string(),
            Some(name) => {
                let known: Vec<&str> = self.scorer.category_names().collect();
                return Err(StoreError::InvalidInput(format!(
                    "unknown category '{name}', expected one of: {}",
                    known.join(", ")
                )));
            }
            None => {
                let text = match title {
                    Some(t) => format!("{t} {content}"),
                    None => content.to_string(),
                };
                self.scorer.categorize(&text)
            }
        };

        let mut record = Record::new(content, CURATED, category, self.scorer.score(content));
        record.title = title.map(str::to_string);
        record.tags = tags;
        Ok(self.append(record))
    }

    /// Append records from an export, keeping their ids, timestamps, and access
    /// statistics. Records whose id is already present are skipped.
    pub fn import(&mut self, records: Vec<Record>) -> StoreResult<ImportResult> {
        for record in &records {
            record.validate().map_err(StoreError::InvalidInput)?;
        }

        let mut imported = 0;
        let mut skipped = 0;
        for record in records {
            if self.get(&record.id).is_some() {
                skipped += 1;
                continue;
            }
            self.records.push(record);
            imported += 1;
        }

        if imported == 0 {
            return Ok(ImportResult {
                imported,
                skipped,
                evicted: 0,
                persisted: true,
            });
        }

        let evicted = self.prune_to_capacity(Utc::now()).len();
        self.mark_changed();
        self.rebuild_index();
        let persisted = self.persist();

        tracing::info!(store = %self.kind(), imported, skipped, evicted, "records imported");
        Ok(ImportResult {
            imported,
            skipped,
            evicted,
            persisted,
        })
    }

    fn append(&mut self, record: Record) -> InsertResult {
        let id = record.id.clone();
        let category = record.category.clone();
        let importance = record.importance;

        tracing::info!(
            store = %self.kind(),
            id = %id,
            category = %category,
            importance,
            content_len = record.content.len(),
            "record stored"
        );

        self.records.push(record);
        let evicted = self.prune_to_capacity(Utc::now()).len();
        self.mark_changed();
        self.rebuild_index();
        let persisted = self.persist();

        InsertResult {
            id,
            category,
            importance,
            persisted,
            evicted,
        }
    }

    pub(crate) fn mark_changed(&mut self) {
        self.revision += 1;
    }

    /// Rebuild the index from every current record. Full recomputation,
    /// O(total corpus size). A build failure leaves the store without an index.
    pub fn rebuild_index(&mut self) {
        let documents: Vec<(String, String)> = self
            .records
            .iter()
            .map(|r| (r.id.clone(), r.indexed_text()))
            .collect();

        self.index = match CorpusIndex::build(&documents, &self.profile.index) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(store = %self.kind(), records = documents.len(), error = %e, "index build failed, retrieval disabled until next mutation");
                None
            }
        };
        self.indexed_revision = Some(self.revision);
    }

    /// Rebuild only if the record set changed since the last build.
    pub(crate) fn ensure_index(&mut self) {
        if self.indexed_revision != Some(self.revision) {
            self.rebuild_index();
        }
    }

    /// Snapshot the full collection. Failures are logged and reported as `false`.
    pub(crate) fn persist(&mut self) -> bool {
        self.snapshot_writes += 1;
        match snapshot::save(&self.path, self.kind(), &self.records) {
            Ok(()) => {
                tracing::debug!(store = %self.kind(), writes = self.snapshot_writes, "store persisted");
                true
            }
            Err(e) => {
                tracing::error!(store = %self.kind(), error = %e, "snapshot save failed, keeping in-memory state");
                false
            }
        }
    }
}

fn require_content(content: &str) -> StoreResult<&str> {
    if content.trim().is_empty() {
        return Err(StoreError::InvalidInput("content must not be empty".into()));
    }
    Ok(content)
}
