//! Vocabulary selection and TF-IDF weighting.
//!
//! Weights are raw term counts scaled by the smoothed inverse document
//! frequency `ln((1 + n) / (1 + df)) + 1`, then L2-normalized per row.

use std::collections::{BTreeMap, HashMap};

use super::tokenize::terms;
use super::{IndexError, SparseVector};
use crate::config::IndexConfig;

/// A fitted vocabulary: term → column, and the idf of each column.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    columns: BTreeMap<String, usize>,
    idf: Vec<f64>,
    ngram_max: usize,
    stop_words: bool,
}

impl Vocabulary {
    /// Fit a vocabulary over `texts`.
    ///
    /// Terms outside the `[min_df, max_df * n]` document-frequency window are
    /// dropped, then the `max_features` most frequent survivors are kept.
    /// Columns are assigned in lexicographic term order.
    pub fn fit(texts: &[String], config: &IndexConfig) -> Result<Self, IndexError> {
        let n_docs = texts.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_freq: HashMap<String, usize> = HashMap::new();

        for text in texts {
            let counts = term_counts(text, config.ngram_max, config.stop_words);
            for (term, count) in counts {
                *total_freq.entry(term.clone()).or_default() += count;
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        // A lone document cannot be "too common".
        let max_doc_count = if n_docs <= 1 {
            n_docs as f64
        } else {
            config.max_df * n_docs as f64
        };

        let mut kept: Vec<(String, usize)> = doc_freq
            .iter()
            .filter(|&(_, &df)| df >= config.min_df && df as f64 <= max_doc_count)
            .map(|(term, _)| (term.clone(), total_freq[term]))
            .collect();

        if kept.is_empty() {
            return Err(IndexError::EmptyVocabulary);
        }

        if kept.len() > config.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(config.max_features);
        }

        let mut names: Vec<String> = kept.into_iter().map(|(term, _)| term).collect();
        names.sort();

        let n = n_docs as f64;
        let idf = names
            .iter()
            .map(|term| ((1.0 + n) / (1.0 + doc_freq[term] as f64)).ln() + 1.0)
            .collect();
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term, col))
            .collect();

        Ok(Self {
            columns,
            idf,
            ngram_max: config.ngram_max,
            stop_words: config.stop_words,
        })
    }

    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.columns.get(term).copied()
    }

    pub fn idf(&self, column: usize) -> f64 {
        self.idf[column]
    }

    /// Weight a text against this vocabulary. Unknown terms contribute nothing.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(text, self.ngram_max, self.stop_words) {
            if let Some(col) = self.column(&term) {
                *weights.entry(col).or_default() += 1.0;
            }
        }
        let entries = weights
            .into_iter()
            .map(|(col, tf)| (col, tf * self.idf[col]))
            .collect();
        SparseVector::from_sorted(entries).normalized()
    }
}

fn term_counts(text: &str, ngram_max: usize, stop_words: bool) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms(text, ngram_max, stop_words) {
        *counts.entry(term).or_default() += 1;
    }
    counts
}
