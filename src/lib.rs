//! Semantic memory for AI agents: persisted text records, TF-IDF retrieval,
//! heuristic importance scoring, and retention-based eviction.
//!
//! Two store variants share one engine:
//!
//! | Store | Phrases | Reduction | Relevance floor | Capacity | Cold start |
//! |-------|---------|-----------|-----------------|----------|------------|
//! | **Memory** | 1–2 words | none | 0.10 | 100 | empty |
//! | **Knowledge** | 1–3 words | truncated SVD, ≤100 dims | 0.05 | unbounded | 5 seed documents |
//!
//! # Architecture
//!
//! - **Index**: vocabulary and weight vectors rebuilt in full after every
//!   mutation (O(corpus) per insert or eviction, never incremental)
//! - **Retrieval**: cosine ranking, top-k, relevance floor, access tracking by record id
//! - **Eviction**: `0.5·importance + 0.3·access + 0.2·recency`, batch prune to capacity
//! - **Durability**: one versioned JSON snapshot per store, rewritten on every
//!   mutation; single-writer, best-effort
//! - **Transport**: MCP over stdio, plus a CLI
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`error`] — Error kinds surfaced by store operations
//! - [`index`] — Tokenizer, TF-IDF weighting, and SVD reduction
//! - [`memory`] — Record store, retrieval, scoring, eviction, and statistics
//! - [`snapshot`] — Snapshot files, version checks, and health checks

pub mod config;
pub mod error;
pub mod index;
pub mod memory;
pub mod snapshot;
