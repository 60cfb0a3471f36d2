//! Embedding-backed query service
//!
//! Answers "what are the k closest reference names to this query text" with
//! deterministic output: dot-product scoring over the cached matrix and a
//! stable top-k selection that breaks ties by insertion order.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::encoder::EmbeddingEngine;
use crate::error::{RecommendError, Result};
use crate::reference::{ReferenceCache, ReferenceEntry, ReferenceRow};
use crate::strategy::{Recommendation, RecommendStrategy};

/// A single query result with the raw (unrounded) similarity score
#[derive(Debug, Clone)]
pub struct QueryMatch {
    pub entry: ReferenceEntry,
    pub score: f32,
}

/// Top-k nearest-embedding lookup service.
///
/// Holds the engine plus a swappable cache snapshot. Queries clone the
/// current `Arc` and run lock-free against it, so a rebuild never exposes a
/// partially built cache: in-flight queries finish on the old snapshot.
pub struct Recommender {
    engine: Arc<EmbeddingEngine>,
    cache: RwLock<Option<Arc<ReferenceCache>>>,
}

impl Recommender {
    /// Create a recommender that is not yet ready to serve queries
    pub fn new(engine: Arc<EmbeddingEngine>) -> Self {
        Self {
            engine,
            cache: RwLock::new(None),
        }
    }

    /// Build (or rebuild) the reference cache and swap it in atomically.
    ///
    /// On failure the previous snapshot, if any, stays in place.
    pub fn build_cache(&self, rows: &[ReferenceRow]) -> Result<()> {
        let cache = ReferenceCache::build(rows, &self.engine)?;
        *self.cache.write() = Some(Arc::new(cache));
        Ok(())
    }

    /// True once a cache build has completed
    pub fn is_ready(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Get the embedding engine reference
    pub fn engine(&self) -> &Arc<EmbeddingEngine> {
        &self.engine
    }

    fn snapshot(&self) -> Result<Arc<ReferenceCache>> {
        self.cache.read().clone().ok_or(RecommendError::NotReady)
    }

    /// Return the k most similar reference entries to `text`.
    ///
    /// Results are sorted by descending score with ties broken by reference
    /// insertion order; length is `min(k, N)`. `k` larger than the cache
    /// clamps; an empty cache yields an empty list.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<QueryMatch>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RecommendError::invalid_input("query text is empty"));
        }
        if k == 0 {
            return Err(RecommendError::invalid_input("k must be positive"));
        }

        let cache = self.snapshot()?;
        if cache.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.engine.embed_query(text)?;
        Ok(top_k(&cache, &query_vector, k))
    }
}

impl RecommendStrategy for Recommender {
    fn recommend(&self, english_name: &str, k: usize) -> Result<Vec<Recommendation>> {
        let matches = self.query(english_name, k)?;
        Ok(matches
            .into_iter()
            .map(|m| Recommendation {
                korean_name: m.entry.korean_name,
                meaning: m.entry.meaning,
                trend_score: m.entry.trend_score,
                gender: m.entry.gender,
            })
            .collect())
    }
}

/// Stable top-k over the cached matrix.
///
/// Scores every row via dot product (cosine similarity, all vectors are
/// unit-norm by construction), then sorts descending with the row index as
/// the explicit tie-breaker.
fn top_k(cache: &ReferenceCache, query: &[f32], k: usize) -> Vec<QueryMatch> {
    let mut scored: Vec<(usize, f32)> = (0..cache.len())
        .map(|i| (i, dot(query, cache.row(i))))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(k.min(cache.len()));

    scored
        .into_iter()
        .map(|(i, score)| QueryMatch {
            entry: cache.entry(i).clone(),
            score,
        })
        .collect()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
