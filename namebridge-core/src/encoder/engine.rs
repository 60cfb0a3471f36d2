//! Embedding engine
//!
//! High-level API over a [`NameEncoder`] with query-side caching.

use dashmap::DashMap;
use std::sync::Arc;

use super::NameEncoder;
use crate::error::Result;

/// Embedding engine with a query-text cache
///
/// Wraps a [`NameEncoder`] with a DashMap cache so repeated queries for the
/// same name skip re-encoding. Reference names are encoded exactly once per
/// cache build and are not cached here.
pub struct EmbeddingEngine {
    encoder: Arc<dyn NameEncoder>,
    query_cache: DashMap<String, Vec<f32>>,
    dimension: usize,
}

impl EmbeddingEngine {
    /// Create an engine around a concrete encoder
    pub fn new(encoder: Arc<dyn NameEncoder>) -> Self {
        let dimension = encoder.dimension();

        log::info!("EmbeddingEngine ready ({}d)", dimension);

        Self {
            encoder,
            query_cache: DashMap::new(),
            dimension,
        }
    }

    /// Embed an English query name, with caching.
    ///
    /// Queries are lowercased before encoding, matching how the query tower
    /// was trained.
    pub fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let key = text.to_lowercase();

        if let Some(cached) = self.query_cache.get(&key) {
            return Ok(cached.clone());
        }

        let embedding = self.encoder.embed_query(&key)?;
        self.query_cache.insert(key, embedding.clone());
        Ok(embedding)
    }

    /// Embed a Korean reference name (uncached)
    pub fn embed_reference(&self, text: &str) -> Result<Vec<f32>> {
        self.encoder.embed_reference(text)
    }

    /// Get embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get cache size
    pub fn cache_size(&self) -> usize {
        self.query_cache.len()
    }

    /// Clear the query cache
    pub fn clear_cache(&self) {
        self.query_cache.clear();
    }
}
