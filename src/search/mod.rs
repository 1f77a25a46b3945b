//! Exact nearest-neighbour search over embedded FAQ questions


use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info};

use crate::corpus::{Corpus, FaqRecord};
use crate::embeddings::EmbeddingProvider;
use crate::{FaqError, Result};

/// Scoring function shared by every query against one index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Cosine similarity, higher is closer
    #[default]
    Cosine,
    /// Squared L2 distance, lower is closer
    Euclidean,
}

impl SimilarityMetric {
    #[inline]
    pub fn score(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Euclidean => squared_euclidean(a, b),
        }
    }

    /// Order two scores best first
    #[inline]
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match self {
            Self::Cosine => b.total_cmp(&a),
            Self::Euclidean => a.total_cmp(&b),
        }
    }
}

impl fmt::Display for SimilarityMetric {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::Euclidean => write!(f, "euclidean"),
        }
    }
}

#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, na, nb) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(d, aa, bb), (x, y)| {
            (d + (x * y), aa + (x * x), bb + (y * y))
        });

    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

/// A corpus row paired with its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFaq {
    /// Position of the record in the corpus it was built from
    pub position: usize,
    pub record: FaqRecord,
    pub embedding: Vec<f32>,
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// 1-based rank within the result set
    pub rank: usize,
    pub position: usize,
    pub score: f32,
    #[serde(flatten)]
    pub record: FaqRecord,
}

/// Flat in-memory index; every query is scored against every entry
#[derive(Debug, Clone)]
pub struct FaqIndex {
    model_id: String,
    metric: SimilarityMetric,
    dimension: usize,
    entries: Vec<IndexedFaq>,
}

impl FaqIndex {
    /// Embed every question of `corpus` in one batch and pair the vectors with their rows
    #[inline]
    pub fn build<P: EmbeddingProvider + ?Sized>(
        corpus: &Corpus,
        provider: &P,
        metric: SimilarityMetric,
    ) -> Result<Self> {
        let questions = corpus.questions();
        let embeddings = provider
            .embed_batch(&questions)
            .map_err(|e| FaqError::Embedding(format!("{:#}", e)))?;

        if embeddings.len() != corpus.len() {
            return Err(FaqError::Embedding(format!(
                "Expected {} embeddings, got {}",
                corpus.len(),
                embeddings.len()
            )));
        }

        let dimension = embeddings.first().map_or(0, Vec::len);
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(FaqError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        let entries = corpus
            .records()
            .iter()
            .cloned()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (record, embedding))| IndexedFaq {
                position,
                record,
                embedding,
            })
            .collect::<Vec<_>>();

        info!(
            "Indexed {} FAQs with model {} ({} dimensions, {} metric)",
            entries.len(),
            provider.model_id(),
            dimension,
            metric
        );

        Ok(Self {
            model_id: provider.model_id().to_string(),
            metric,
            dimension,
            entries,
        })
    }

    #[inline]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    #[inline]
    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn entries(&self) -> &[IndexedFaq] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `k` entries for an already embedded query, best first.
    ///
    /// Returns `min(len, k)` hits. Equal scores keep corpus order.
    #[inline]
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if !self.entries.is_empty() && query_embedding.len() != self.dimension {
            return Err(FaqError::DimensionMismatch {
                expected: self.dimension,
                actual: query_embedding.len(),
            });
        }

        let mut scored: Vec<(&IndexedFaq, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, self.metric.score(query_embedding, &entry.embedding)))
            .collect();

        scored.sort_by(|a, b| self.metric.compare(a.1, b.1));

        let hits = scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(i, (entry, score))| SearchHit {
                rank: i + 1,
                position: entry.position,
                score,
                record: entry.record.clone(),
            })
            .collect::<Vec<_>>();

        debug!("Search returned {} of {} entries", hits.len(), self.entries.len());
        Ok(hits)
    }

    /// Embed `query` with `provider` and search.
    ///
    /// The provider must be the model the index was built with.
    #[inline]
    pub fn search_text<P: EmbeddingProvider + ?Sized>(
        &self,
        provider: &P,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        if provider.model_id() != self.model_id {
            return Err(FaqError::ModelMismatch {
                index: self.model_id.clone(),
                query: provider.model_id().to_string(),
            });
        }

        let query_embedding = provider
            .embed(query)
            .map_err(|e| FaqError::Embedding(format!("{:#}", e)))?;

        self.search(&query_embedding, k)
    }
}
