use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::store::Store;
use crate::memory::types::StoreKind;

/// Response from [`Store::stats`].
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub store: StoreKind,
    pub total_records: usize,
    pub by_category: BTreeMap<String, usize>,
    pub average_importance: f64,
    /// Mean content length in characters.
    pub average_content_length: f64,
    pub vocabulary_size: usize,
    /// Width of the vectors retrieval compares (reduced width when reduction is active).
    pub vector_dimensions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_record: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_record: Option<DateTime<Utc>>,
}

impl Store {
    /// Summary statistics. An empty store reports zeros.
    pub fn stats(&self) -> StatsResponse {
        let total = self.records.len();

        let mut by_category = BTreeMap::new();
        for record in &self.records {
            *by_category.entry(record.category.clone()).or_insert(0) += 1;
        }

        let mean = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };
        let average_importance = mean(self.records.iter().map(|r| r.importance).sum());
        let average_content_length =
            mean(self.records.iter().map(|r| r.content.chars().count() as f64).sum());

        let (vocabulary_size, vector_dimensions) = self
            .index
            .as_ref()
            .map(|i| (i.vocabulary_size(), i.dimensions()))
            .unwrap_or((0, 0));

        StatsResponse {
            store: self.kind(),
            total_records: total,
            by_category,
            average_importance,
            average_content_length,
            vocabulary_size,
            vector_dimensions,
            oldest_record: self.records.iter().map(|r| r.created_at).min(),
            newest_record: self.records.iter().map(|r| r.created_at).max(),
        }
    }
}
