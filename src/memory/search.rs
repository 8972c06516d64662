//! Read path: rank → top-k → relevance floor → access tracking.

use chrono::Utc;
use serde::Serialize;

use super::store::Store;
use crate::memory::types::Record;

// ── Public types ──────────────────────────────────────────────────────────────

/// A single retrieval hit.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedRecord {
    pub id: String,
    pub content: String,
    pub provenance: String,
    pub category: String,
    pub importance: f64,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RetrievedRecord {
    fn from_record(record: &Record, similarity: f64) -> Self {
        Self {
            id: record.id.clone(),
            content: record.content.clone(),
            provenance: record.provenance.clone(),
            category: record.category.clone(),
            importance: record.importance,
            similarity,
            title: record.title.clone(),
            tags: record.tags.clone(),
        }
    }
}

/// Response from [`Store::retrieve`].
#[derive(Debug, Default, Serialize)]
pub struct RecallResponse {
    pub results: Vec<RetrievedRecord>,
    /// Number of records that were scored against the query.
    pub total_scored: usize,
    /// Set when retrieval degraded to an empty result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RecallResponse {
    fn degraded(warning: impl Into<String>) -> Self {
        Self {
            warning: Some(warning.into()),
            ..Self::default()
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

impl Store {
    /// Retrieve at most `k` records most similar to `query`.
    ///
    /// Records are ranked by cosine similarity (ties keep insertion order),
    /// cut to the top `k`, then anything below the store's relevance floor is
    /// dropped. Only the returned records have their access statistics bumped.
    /// Never fails: an empty store, a missing index, or a vectorization error
    /// all produce an empty result.
    pub fn retrieve(&mut self, query: &str, k: usize) -> RecallResponse {
        if self.records.is_empty() || k == 0 {
            return RecallResponse::default();
        }

        self.ensure_index();
        let Some(index) = self.index.as_ref() else {
            tracing::warn!(store = %self.kind(), "no index available, returning no results");
            return RecallResponse::degraded("no index available for this store");
        };

        let similarities = match index.similarities(query) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(store = %self.kind(), error = %e, "query vectorization failed");
                return RecallResponse::degraded(format!("vectorization failed: {e}"));
            }
        };

        let mut ranked: Vec<(usize, f64)> = similarities.into_iter().enumerate().collect();
        let total_scored = ranked.len();
        // stable: equal scores keep row (insertion) order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let floor = self.profile.relevance_floor;
        let hits: Vec<(String, f64)> = ranked
            .into_iter()
            .take(k)
            .filter(|&(_, sim)| sim >= floor)
            .map(|(row, sim)| (index.ids()[row].clone(), sim))
            .collect();

        let now = Utc::now();
        let mut results = Vec::with_capacity(hits.len());
        for (id, similarity) in hits {
            let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
                tracing::warn!(id = %id, "indexed record vanished before access update");
                continue;
            };
            record.touch(now);
            results.push(RetrievedRecord::from_record(record, similarity));
        }

        tracing::debug!(
            store = %self.kind(),
            query_len = query.len(),
            k,
            returned = results.len(),
            total_scored,
            "retrieval complete"
        );

        if !results.is_empty() {
            self.persist();
        }

        RecallResponse {
            results,
            total_scored,
            warning: None,
        }
    }

    /// [`Store::retrieve`] with the store's configured default `k`.
    pub fn retrieve_default(&mut self, query: &str) -> RecallResponse {
        let k = self.profile.default_k;
        self.retrieve(query, k)
    }
}
