//! Term-weight index over a store's records.
//!
//! A [`CorpusIndex`] is a derived, disposable artifact: a TF-IDF vocabulary
//! plus one L2-normalized weight vector per record, optionally projected into
//! a dense space by a [`reduce::Reducer`]. It is always rebuilt from the full
//! record collection, never updated incrementally, so every mutation costs
//! O(total corpus size).

pub mod reduce;
pub mod tokenize;
pub mod weighting;

use ndarray::Array2;

use crate::config::IndexConfig;
use reduce::{dense_cosine, Decomposition, Reducer};
use weighting::Vocabulary;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IndexError {
    /// No term survived tokenization and document-frequency pruning.
    #[error("no terms remain after pruning; corpus is all stop words or too uniform")]
    EmptyVocabulary,

    /// Similarity computation produced NaN or infinity.
    #[error("similarity computation produced a non-finite value")]
    NonFinite,
}

/// Sparse weight vector with entries sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(column, weight)` pairs already sorted by column.
    pub fn from_sorted(entries: Vec<(usize, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom > 0.0 {
            self.dot(other) / denom
        } else {
            0.0
        }
    }
}

/// Dense projection of the corpus, present only when reduction is active.
#[derive(Debug, Clone, PartialEq)]
struct Projection {
    reducer: Reducer,
    rows: Array2<f64>,
}

/// Vocabulary and weight vectors for one snapshot of a record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusIndex {
    vocabulary: Vocabulary,
    /// Record id for each row, in record order.
    ids: Vec<String>,
    rows: Vec<SparseVector>,
    projection: Option<Projection>,
}

impl CorpusIndex {
    /// Build an index over `documents` (`(record id, indexed text)` pairs).
    ///
    /// An empty corpus yields `Ok(None)`: "no index" means "no results".
    pub fn build(
        documents: &[(String, String)],
        config: &IndexConfig,
    ) -> Result<Option<Self>, IndexError> {
        if documents.is_empty() {
            return Ok(None);
        }

        let texts: Vec<String> = documents.iter().map(|(_, text)| text.clone()).collect();
        let vocabulary = Vocabulary::fit(&texts, config)?;
        let rows: Vec<SparseVector> = texts.iter().map(|t| vocabulary.transform(t)).collect();

        let projection = match config.reduce_to {
            Some(width) if rows.len() > 1 => match Reducer::fit(&rows, vocabulary.len(), width) {
                Some(reducer) => {
                    let reduced = reducer.project_rows(&rows);
                    Some(Projection {
                        reducer,
                        rows: reduced,
                    })
                }
                None => {
                    tracing::warn!("corpus matrix has no usable components, keeping sparse vectors");
                    None
                }
            },
            _ => None,
        };

        tracing::debug!(
            records = rows.len(),
            vocabulary = vocabulary.len(),
            reduced = ?projection.as_ref().map(|p| p.reducer.width()),
            decomposition = ?projection.as_ref().map(|p| p.reducer.decomposition()),
            leading_singular_value = ?projection
                .as_ref()
                .and_then(|p| p.reducer.singular_values().first().copied()),
            "index built"
        );

        Ok(Some(Self {
            vocabulary,
            ids: documents.iter().map(|(id, _)| id.clone()).collect(),
            rows,
            projection,
        }))
    }

    /// Record ids in row order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_reduced(&self) -> bool {
        self.projection.is_some()
    }

    /// Width of the vectors similarities are computed over.
    pub fn dimensions(&self) -> usize {
        match &self.projection {
            Some(p) => p.reducer.width(),
            None => self.vocabulary.len(),
        }
    }

    /// How the dense projection was fitted, when reduction is active.
    pub fn decomposition(&self) -> Option<Decomposition> {
        self.projection.as_ref().map(|p| p.reducer.decomposition())
    }

    /// Weight a query against the current vocabulary. Never rebuilds.
    pub fn vectorize(&self, text: &str) -> SparseVector {
        self.vocabulary.transform(text)
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn similarities(&self, query: &str) -> Result<Vec<f64>, IndexError> {
        let vector = self.vectorize(query);
        let scores: Vec<f64> = match &self.projection {
            Some(p) => {
                let q = p.reducer.project(&vector);
                p.rows
                    .rows()
                    .into_iter()
                    .map(|row| dense_cosine(q.view(), row))
                    .collect()
            }
            None => self.rows.iter().map(|row| vector.cosine(row)).collect(),
        };

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(IndexError::NonFinite);
        }
        Ok(scores)
    }
}
