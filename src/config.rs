use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StoreError;
use crate::memory::scoring::DEFAULT_CATEGORY;
use crate::memory::types::StoreKind;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecollectConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub memory: MemoryConfig,
    pub knowledge: KnowledgeConfig,
    pub scoring: ScoringConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_snapshot: String,
    pub knowledge_snapshot: String,
}

/// Personal-memory store settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    pub capacity: usize,
    pub relevance_floor: f64,
    pub default_k: usize,
    pub max_features: usize,
    pub ngram_max: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub stop_words: bool,
    /// Phrases that mark a statement as worth remembering.
    pub triggers: Vec<String>,
    pub categories: Vec<CategoryConfig>,
}

/// Knowledge-base store settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub capacity: Option<usize>,
    pub relevance_floor: f64,
    pub default_k: usize,
    pub max_features: usize,
    pub ngram_max: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub stop_words: bool,
    pub reduce_to: Option<usize>,
    pub categories: Vec<CategoryConfig>,
}

/// One entry of an ordered category table. Order is the tie-break order.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_importance: f64,
    pub length_threshold: usize,
    pub length_bonus: f64,
    pub rules: Vec<BonusRule>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BonusRule {
    pub phrases: Vec<String>,
    pub bonus: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetentionConfig {
    pub importance_weight: f64,
    pub access_weight: f64,
    pub recency_weight: f64,
    pub access_scale: f64,
    pub recency_horizon_days: f64,
    /// Clamp `access_count * access_scale` to 1.0. Off by default.
    pub cap_access_term: bool,
}

/// Vocabulary and weighting parameters for one store's index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub max_features: usize,
    pub ngram_max: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub stop_words: bool,
    /// Target width of the dense projection, `None` to keep sparse vectors.
    pub reduce_to: Option<usize>,
}

/// Resolved per-store settings, shared shape for both store kinds.
#[derive(Debug, Clone)]
pub struct StoreProfile {
    pub kind: StoreKind,
    pub capacity: Option<usize>,
    pub relevance_floor: f64,
    pub default_k: usize,
    pub index: IndexConfig,
    pub categories: Vec<CategoryConfig>,
    pub triggers: Vec<String>,
}

impl Default for RecollectConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            memory: MemoryConfig::default(),
            knowledge: KnowledgeConfig::default(),
            scoring: ScoringConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_recollect_dir();
        Self {
            memory_snapshot: dir.join("memory.json").to_string_lossy().into_owned(),
            knowledge_snapshot: dir.join("knowledge.json").to_string_lossy().into_owned(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            relevance_floor: 0.1,
            default_k: 5,
            max_features: 2000,
            ngram_max: 2,
            min_df: 1,
            max_df: 1.0,
            stop_words: true,
            triggers: strings(&["remember", "my name", "i am", "i live", "i work", "i like"]),
            categories: vec![
                category("personal", &["name", "mann", "gupta", "bangalore", "india", "age"]),
                category("work", &["job", "work", "programming", "software", "tech", "coding"]),
                category("preferences", &["like", "prefer", "favorite", "enjoy", "python"]),
                category("general", &["other", "misc", "information"]),
            ],
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            relevance_floor: 0.05,
            default_k: 3,
            max_features: 3000,
            ngram_max: 3,
            min_df: 1,
            max_df: 0.9,
            stop_words: true,
            reduce_to: Some(100),
            categories: vec![
                category("programming", &["python", "programming", "code", "algorithm", "data structure"]),
                category("ai", &["machine learning", "artificial intelligence", "neural network", "deep learning"]),
                category("software", &["software", "testing", "version control", "design pattern", "review"]),
                category("tech", &["technology", "tech", "startup", "it hub", "industry"]),
                category("general", &[]),
            ],
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_importance: 0.5,
            length_threshold: 50,
            length_bonus: 0.1,
            rules: vec![
                BonusRule {
                    phrases: strings(&["mann gupta", "bangalore", "my name"]),
                    bonus: 0.4,
                },
                BonusRule {
                    phrases: strings(&["python", "programming", "tech"]),
                    bonus: 0.2,
                },
            ],
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            importance_weight: 0.5,
            access_weight: 0.3,
            recency_weight: 0.2,
            access_scale: 0.1,
            recency_horizon_days: 365.0,
            cap_access_term: false,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn category(name: &str, keywords: &[&str]) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        keywords: strings(keywords),
    }
}

/// Returns `~/.recollect/`
pub fn default_recollect_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".recollect")
}

/// Returns the default config file path: `~/.recollect/config.toml`
pub fn default_config_path() -> PathBuf {
    default_recollect_dir().join("config.toml")
}

impl RecollectConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            RecollectConfig::default()
        };

        config.apply_env_overrides();
        config.validate().context("config validation failed")?;
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (RECOLLECT_MEMORY_SNAPSHOT, RECOLLECT_KNOWLEDGE_SNAPSHOT, RECOLLECT_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RECOLLECT_MEMORY_SNAPSHOT") {
            self.storage.memory_snapshot = val;
        }
        if let Ok(val) = std::env::var("RECOLLECT_KNOWLEDGE_SNAPSHOT") {
            self.storage.knowledge_snapshot = val;
        }
        if let Ok(val) = std::env::var("RECOLLECT_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the snapshot path for a store, expanding `~` if needed.
    pub fn snapshot_path(&self, kind: StoreKind) -> PathBuf {
        match kind {
            StoreKind::Memory => expand_tilde(&self.storage.memory_snapshot),
            StoreKind::Knowledge => expand_tilde(&self.storage.knowledge_snapshot),
        }
    }

    /// Resolved settings for one store kind.
    pub fn profile(&self, kind: StoreKind) -> StoreProfile {
        match kind {
            StoreKind::Memory => {
                let m = &self.memory;
                StoreProfile {
                    kind,
                    capacity: Some(m.capacity),
                    relevance_floor: m.relevance_floor,
                    default_k: m.default_k,
                    index: IndexConfig {
                        max_features: m.max_features,
                        ngram_max: m.ngram_max,
                        min_df: m.min_df,
                        max_df: m.max_df,
                        stop_words: m.stop_words,
                        reduce_to: None,
                    },
                    categories: m.categories.clone(),
                    triggers: m.triggers.clone(),
                }
            }
            StoreKind::Knowledge => {
                let k = &self.knowledge;
                StoreProfile {
                    kind,
                    capacity: k.capacity,
                    relevance_floor: k.relevance_floor,
                    default_k: k.default_k,
                    index: IndexConfig {
                        max_features: k.max_features,
                        ngram_max: k.ngram_max,
                        min_df: k.min_df,
                        max_df: k.max_df,
                        stop_words: k.stop_words,
                        reduce_to: k.reduce_to,
                    },
                    categories: k.categories.clone(),
                    triggers: Vec::new(),
                }
            }
        }
    }

    /// Check every threshold and weight. This is the only failure that
    /// should abort store construction.
    pub fn validate(&self) -> Result<(), StoreError> {
        for kind in [StoreKind::Memory, StoreKind::Knowledge] {
            self.profile(kind).validate()?;
        }
        self.scoring.validate()?;
        self.retention.validate()
    }
}

impl StoreProfile {
    pub fn validate(&self) -> Result<(), StoreError> {
        let kind = self.kind;
        let fail = |msg: String| Err(StoreError::Configuration(format!("[{kind}] {msg}")));

        if self.capacity == Some(0) {
            return fail("capacity must be at least 1".into());
        }
        if !(self.relevance_floor > 0.0 && self.relevance_floor <= 1.0) {
            return fail(format!(
                "relevance_floor must be in (0, 1], got {}",
                self.relevance_floor
            ));
        }
        let index = &self.index;
        if index.max_features == 0 {
            return fail("max_features must be at least 1".into());
        }
        if index.ngram_max == 0 {
            return fail("ngram_max must be at least 1".into());
        }
        if index.min_df == 0 {
            return fail("min_df must be at least 1".into());
        }
        if !(index.max_df > 0.0 && index.max_df <= 1.0) {
            return fail(format!("max_df must be in (0, 1], got {}", index.max_df));
        }
        if index.reduce_to == Some(0) {
            return fail("reduce_to must be at least 1 when set".into());
        }
        if !self.categories.iter().any(|c| c.name == DEFAULT_CATEGORY) {
            return fail("category table must include a 'general' entry".into());
        }
        Ok(())
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), StoreError> {
        if !(0.0..=1.0).contains(&self.base_importance) {
            return Err(StoreError::Configuration(format!(
                "scoring.base_importance must be in [0, 1], got {}",
                self.base_importance
            )));
        }
        let bonuses = self.rules.iter().map(|r| r.bonus).chain([self.length_bonus]);
        for bonus in bonuses {
            if !bonus.is_finite() || bonus < 0.0 {
                return Err(StoreError::Configuration(format!(
                    "scoring bonuses must be finite and non-negative, got {bonus}"
                )));
            }
        }
        Ok(())
    }
}

impl RetentionConfig {
    fn validate(&self) -> Result<(), StoreError> {
        let weights = [
            self.importance_weight,
            self.access_weight,
            self.recency_weight,
            self.access_scale,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(StoreError::Configuration(
                "retention weights must be finite and non-negative".into(),
            ));
        }
        if !(self.recency_horizon_days > 0.0) {
            return Err(StoreError::Configuration(format!(
                "retention.recency_horizon_days must be positive, got {}",
                self.recency_horizon_days
            )));
        }
        Ok(())
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
