//! Reference table cache
//!
//! Materializes the full embedding matrix for all known Korean reference
//! names once, keeping entry payloads aligned to matrix rows by position.
//! Immutable after build; queries only read it.

use serde::{Deserialize, Serialize};

use crate::encoder::EmbeddingEngine;
use crate::error::{RecommendError, Result};

/// Gender tag carried by reference entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

/// Raw reference row as provided by the data source.
///
/// Mirrors the name-trend table; the origin (flat file, database) is
/// irrelevant to the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub korean_name: String,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub trend_score: f32,
    #[serde(default)]
    pub meaning: Option<String>,
}

/// Immutable payload snapshot for one cached reference entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Insertion position in the cache, unique per build
    pub id: u32,
    pub korean_name: String,
    pub meaning: Option<String>,
    pub trend_score: f32,
    pub gender: Gender,
}

/// Dense embedding matrix plus position-aligned entry payloads.
///
/// Invariant: matrix row i corresponds exactly to `entries[i]`; both sides
/// have equal length. Populated exactly once per build, read-only after.
#[derive(Debug)]
pub struct ReferenceCache {
    entries: Vec<ReferenceEntry>,
    /// Row-major, `entries.len() * dim` values
    matrix: Vec<f32>,
    dim: usize,
}

impl ReferenceCache {
    /// Build the cache by encoding every row's Korean name.
    ///
    /// A row that fails to encode is skipped with a diagnostic; a single
    /// malformed row never aborts the build. A non-empty row list that
    /// filters down to nothing is an [`RecommendError::EmptyReferenceSet`];
    /// an empty row list yields a valid cache that matches no queries.
    pub fn build(rows: &[ReferenceRow], engine: &EmbeddingEngine) -> Result<Self> {
        let dim = engine.dimension();
        let mut entries = Vec::with_capacity(rows.len());
        let mut matrix = Vec::with_capacity(rows.len() * dim);
        let mut skipped = 0usize;

        for row in rows {
            match engine.embed_reference(&row.korean_name) {
                Ok(vector) => {
                    debug_assert_eq!(vector.len(), dim);
                    entries.push(ReferenceEntry {
                        id: entries.len() as u32,
                        korean_name: row.korean_name.clone(),
                        meaning: row.meaning.clone(),
                        trend_score: row.trend_score,
                        gender: row.gender,
                    });
                    matrix.extend_from_slice(&vector);
                }
                Err(e) => {
                    log::warn!("Skipping reference row {:?}: {}", row.korean_name, e);
                    skipped += 1;
                }
            }
        }

        if entries.is_empty() && skipped > 0 {
            return Err(RecommendError::EmptyReferenceSet);
        }

        if skipped > 0 {
            log::warn!("Skipped {} of {} reference rows", skipped, rows.len());
        }
        log::info!("Reference cache built: {} entries ({}d)", entries.len(), dim);

        Ok(Self {
            entries,
            matrix,
            dim,
        })
    }

    /// Number of cached entries N
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension D
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Payload for matrix row `i`
    pub fn entry(&self, i: usize) -> &ReferenceEntry {
        &self.entries[i]
    }

    /// All payloads, in matrix row order
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Embedding vector for matrix row `i`
    pub fn row(&self, i: usize) -> &[f32] {
        &self.matrix[i * self.dim..(i + 1) * self.dim]
    }
}
