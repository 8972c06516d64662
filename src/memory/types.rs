//! Core record type definitions.
//!
//! Defines [`StoreKind`] (which of the two store variants a record lives in)
//! and [`Record`] (a persisted memory or knowledge document).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two store variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Personal memories: unigram+bigram index, capacity-bounded, empty cold start.
    Memory,
    /// Curated documents: up to trigrams, SVD-reduced, seeded cold start.
    Knowledge,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Knowledge => "knowledge",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "knowledge" => Ok(Self::Knowledge),
            _ => Err(format!("unknown store: {s} (expected 'memory' or 'knowledge')")),
        }
    }
}

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// UUID v7 assigned at insertion. The only stable handle to a record.
    pub id: String,
    /// The text of the record. Never empty.
    pub content: String,
    /// Free-text origin tag, e.g. `"user_statement"` or `"seed"`.
    pub provenance: String,
    pub category: String,
    /// In `[0.0, 1.0]`, fixed at insertion.
    pub importance: f64,
    pub created_at: DateTime<Utc>,
    /// Number of times this record has been returned by a retrieval.
    pub access_count: u32,
    pub last_accessed: Option<DateTime<Utc>>,
    /// Knowledge documents only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Knowledge documents only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Record {
    pub fn new(
        content: impl Into<String>,
        provenance: impl Into<String>,
        category: impl Into<String>,
        importance: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            content: content.into(),
            provenance: provenance.into(),
            category: category.into(),
            importance,
            created_at: Utc::now(),
            access_count: 0,
            last_accessed: None,
            title: None,
            tags: Vec::new(),
        }
    }

    /// Text the index sees: `"{title} {content}"` when titled.
    pub fn indexed_text(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} {}", self.content),
            None => self.content.clone(),
        }
    }

    /// Record one retrieval hit.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed = Some(at);
    }

    /// Check the invariants a loaded or imported record must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err(format!("record {} has empty content", self.id));
        }
        if !(0.0..=1.0).contains(&self.importance) {
            return Err(format!(
                "record {} has importance {} outside [0, 1]",
                self.id, self.importance
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kind_round_trips_through_strings() {
        for kind in [StoreKind::Memory, StoreKind::Knowledge] {
            assert_eq!(kind.as_str().parse::<StoreKind>().unwrap(), kind);
        }
        assert!("archive".parse::<StoreKind>().is_err());
    }

    #[test]
    fn indexed_text_prefixes_title() {
        let mut record = Record::new("Ownership rules", "curated", "programming", 0.5);
        assert_eq!(record.indexed_text(), "Ownership rules");
        record.title = Some("Rust".into());
        assert_eq!(record.indexed_text(), "Rust Ownership rules");
    }

    #[test]
    fn touch_bumps_access_stats() {
        let mut record = Record::new("note", "test", "general", 0.5);
        let now = Utc::now();
        record.touch(now);
        record.touch(now);
        assert_eq!(record.access_count, 2);
        assert_eq!(record.last_accessed, Some(now));
    }

    #[test]
    fn validate_rejects_bad_records() {
        let mut record = Record::new("  ", "test", "general", 0.5);
        assert!(record.validate().is_err());
        record.content = "fine".into();
        record.importance = 1.5;
        assert!(record.validate().is_err());
        record.importance = 1.0;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn memory_records_omit_knowledge_fields_in_json() {
        let record = Record::new("note", "test", "general", 0.5);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("tags").is_none());
        assert_eq!(json["access_count"], 0);
    }
}
