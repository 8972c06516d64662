use chrono::{DateTime, Utc};
use serde::Serialize;

use super::store::Store;
use crate::config::RetentionConfig;
use crate::memory::types::Record;

// ── Result types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct EvictionResult {
    /// Ids of removed records.
    pub evicted: Vec<String>,
    pub remaining: usize,
    /// Snapshot outcome after eviction; `true` when nothing was evicted.
    pub persisted: bool,
}

// ── Retention scoring ────────────────────────────────────────────────────────

/// Composite retention score used only to rank records for eviction:
///
/// `importance_weight·importance + access_weight·(access_count·access_scale)
///  + recency_weight·max(0, 1 − age_days/horizon)`
///
/// The access term is not clamped unless `cap_access_term` is set, so a
/// heavily used record can outrank everything else.
pub fn retention_score(record: &Record, now: DateTime<Utc>, policy: &RetentionConfig) -> f64 {
    let age_days = (now - record.created_at).num_days() as f64;

    let mut access = record.access_count as f64 * policy.access_scale;
    if policy.cap_access_term {
        access = access.min(1.0);
    }
    let recency = (1.0 - age_days / policy.recency_horizon_days).max(0.0);

    policy.importance_weight * record.importance
        + policy.access_weight * access
        + policy.recency_weight * recency
}

/// Split `records` into the `capacity` highest-retention survivors and the
/// rest. Ties keep insertion order; survivors stay in insertion order.
pub fn select_survivors(
    records: Vec<Record>,
    capacity: usize,
    now: DateTime<Utc>,
    policy: &RetentionConfig,
) -> (Vec<Record>, Vec<Record>) {
    if records.len() <= capacity {
        return (records, Vec::new());
    }

    let mut ranked: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i, retention_score(r, now, policy)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut keep = vec![false; records.len()];
    for &(i, _) in ranked.iter().take(capacity) {
        keep[i] = true;
    }

    let (survivors, evicted): (Vec<_>, Vec<_>) = records
        .into_iter()
        .zip(keep)
        .partition(|(_, kept)| *kept);
    (
        survivors.into_iter().map(|(r, _)| r).collect(),
        evicted.into_iter().map(|(r, _)| r).collect(),
    )
}

// ── Capacity enforcement ─────────────────────────────────────────────────────

impl Store {
    /// Prune down to capacity if over it, in one pass, then rebuild and persist.
    /// A store without a capacity bound is never pruned.
    pub fn enforce_capacity(&mut self) -> EvictionResult {
        self.enforce_capacity_at(Utc::now())
    }

    /// [`Store::enforce_capacity`] with an explicit clock.
    pub fn enforce_capacity_at(&mut self, now: DateTime<Utc>) -> EvictionResult {
        let evicted = self.prune_to_capacity(now);
        if evicted.is_empty() {
            return self.nothing_evicted();
        }

        self.mark_changed();
        self.rebuild_index();
        let persisted = self.persist();

        EvictionResult {
            evicted: evicted.into_iter().map(|r| r.id).collect(),
            remaining: self.records.len(),
            persisted,
        }
    }

    /// Drop the lowest-retention records until the store fits its capacity.
    /// Leaves the index and snapshot to the caller.
    pub(crate) fn prune_to_capacity(&mut self, now: DateTime<Utc>) -> Vec<Record> {
        let Some(capacity) = self.profile.capacity else {
            return Vec::new();
        };
        if self.records.len() <= capacity {
            return Vec::new();
        }

        let records = std::mem::take(&mut self.records);
        let before = records.len();
        let (survivors, evicted) = select_survivors(records, capacity, now, &self.retention);
        self.records = survivors;

        tracing::info!(
            store = %self.kind(),
            before,
            evicted = evicted.len(),
            remaining = self.records.len(),
            "evicted low-retention records"
        );
        evicted
    }

    fn nothing_evicted(&self) -> EvictionResult {
        EvictionResult {
            evicted: Vec::new(),
            remaining: self.records.len(),
            persisted: true,
        }
    }
}
