//! Heuristic importance scoring and keyword categorization.
//!
//! Both tables come from configuration; nothing here is global state.

use crate::config::{BonusRule, CategoryConfig, ScoringConfig};

/// Fallback category when no keyword matches.
pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone)]
pub struct Scorer {
    base: f64,
    length_threshold: usize,
    length_bonus: f64,
    rules: Vec<BonusRule>,
    categories: Vec<CategoryConfig>,
}

impl Scorer {
    pub fn new(scoring: &ScoringConfig, categories: &[CategoryConfig]) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            base: scoring.base_importance,
            length_threshold: scoring.length_threshold,
            length_bonus: scoring.length_bonus,
            rules: scoring
                .rules
                .iter()
                .map(|r| BonusRule {
                    phrases: lower(&r.phrases),
                    bonus: r.bonus,
                })
                .collect(),
            categories: categories
                .iter()
                .map(|c| CategoryConfig {
                    name: c.name.clone(),
                    keywords: lower(&c.keywords),
                })
                .collect(),
        }
    }

    /// Importance in `[0, 1]`: base plus each matching rule's bonus once,
    /// plus the length bonus, clamped once at the end.
    pub fn score(&self, content: &str) -> f64 {
        let lower = content.to_lowercase();
        let mut importance = self.base;

        for rule in &self.rules {
            if rule.phrases.iter().any(|p| lower.contains(p.as_str())) {
                importance += rule.bonus;
            }
        }
        if content.chars().count() > self.length_threshold {
            importance += self.length_bonus;
        }

        importance.clamp(0.0, 1.0)
    }

    /// Category with the most keyword hits. Ties go to the earlier category
    /// in table order; no hits at all gives [`DEFAULT_CATEGORY`].
    pub fn categorize(&self, content: &str) -> String {
        let lower = content.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for category in &self.categories {
            let hits = category
                .keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .count();
            if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
                best = Some((category.name.as_str(), hits));
            }
        }

        best.map(|(name, _)| name.to_string())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}
