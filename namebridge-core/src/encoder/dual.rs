//! Static dual-encoder model
//!
//! Two character-level towers (English query side, Korean reference side)
//! exported from training as per-character embedding tables. Encoding is a
//! table lookup, a masked mean pool over non-pad positions, and an L2
//! normalize, so dot product against other outputs equals cosine similarity.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::NameEncoder;
use crate::error::{RecommendError, Result};
use crate::vocab::{CharVocab, PAD_ID};

/// On-disk artifact format version
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// One encoder tower: a frozen vocabulary plus its embedding table.
///
/// The table has `vocab.size()` rows (pad and unk rows included) of
/// `dim` values each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderTower {
    vocab: CharVocab,
    table: Vec<Vec<f32>>,
}

impl EncoderTower {
    /// Create a tower, validating table shape against the vocabulary
    pub fn new(vocab: CharVocab, table: Vec<Vec<f32>>, dim: usize) -> Result<Self> {
        if table.len() != vocab.size() {
            return Err(RecommendError::model(format!(
                "Embedding table has {} rows, vocabulary needs {}",
                table.len(),
                vocab.size()
            )));
        }
        if let Some(row) = table.iter().find(|row| row.len() != dim) {
            return Err(RecommendError::model(format!(
                "Embedding table row has {} values, expected {}",
                row.len(),
                dim
            )));
        }
        Ok(Self { vocab, table })
    }

    /// The tower's frozen vocabulary
    pub fn vocab(&self) -> &CharVocab {
        &self.vocab
    }

    /// Encode text into a unit-norm vector of length `dim`.
    ///
    /// Fails when the text has no encodable characters (all pad) or pools
    /// to a zero vector.
    fn encode(&self, text: &str, dim: usize) -> Result<Vec<f32>> {
        let tokens = self.vocab.tokenize(text);

        let mut pooled = vec![0.0f32; dim];
        let mut count = 0usize;
        for &id in &tokens {
            if id == PAD_ID {
                continue;
            }
            let row = &self.table[id as usize];
            for (acc, value) in pooled.iter_mut().zip(row) {
                *acc += value;
            }
            count += 1;
        }

        if count == 0 {
            return Err(RecommendError::encoding(format!(
                "No encodable characters in {:?}",
                text
            )));
        }

        for value in pooled.iter_mut() {
            *value /= count as f32;
        }

        let norm = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Err(RecommendError::encoding(format!(
                "Zero-norm embedding for {:?}",
                text
            )));
        }
        for value in pooled.iter_mut() {
            *value /= norm;
        }

        Ok(pooled)
    }
}

/// Serialized model artifact (bincode)
#[derive(Serialize, Deserialize)]
struct Artifact {
    format_version: u32,
    dim: usize,
    query_tower: EncoderTower,
    reference_tower: EncoderTower,
}

/// Character-level dual encoder with a query tower and a reference tower
#[derive(Debug)]
pub struct DualEncoder {
    dim: usize,
    query_tower: EncoderTower,
    reference_tower: EncoderTower,
}

impl DualEncoder {
    /// Create a dual encoder from two towers sharing dimension `dim`
    pub fn new(query_tower: EncoderTower, reference_tower: EncoderTower, dim: usize) -> Self {
        Self {
            dim,
            query_tower,
            reference_tower,
        }
    }

    /// Load a dual encoder from a bincode model artifact
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecommendError::model(format!(
                "Model artifact not found at: {}",
                path.display()
            )));
        }

        log::info!("Loading dual encoder from: {}", path.display());

        let bytes = std::fs::read(path)?;
        let artifact: Artifact = bincode::deserialize(&bytes)?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(RecommendError::model(format!(
                "Unsupported artifact format version {} (expected {})",
                artifact.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        let encoder = Self::new(artifact.query_tower, artifact.reference_tower, artifact.dim);
        encoder.validate()?;

        log::info!(
            "Loaded dual encoder ({}d, query max {} chars, reference max {} chars)",
            encoder.dim,
            encoder.query_tower.vocab.max_len(),
            encoder.reference_tower.vocab.max_len()
        );

        Ok(encoder)
    }

    /// Write the model artifact to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let artifact = Artifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            dim: self.dim,
            query_tower: self.query_tower.clone(),
            reference_tower: self.reference_tower.clone(),
        };
        std::fs::write(path, bincode::serialize(&artifact)?)?;
        Ok(())
    }

    /// Query-side vocabulary
    pub fn query_vocab(&self) -> &CharVocab {
        self.query_tower.vocab()
    }

    /// Reference-side vocabulary
    pub fn reference_vocab(&self) -> &CharVocab {
        self.reference_tower.vocab()
    }

    fn validate(&self) -> Result<()> {
        // Rebuild both towers through the shape checks
        EncoderTower::new(
            self.query_tower.vocab.clone(),
            self.query_tower.table.clone(),
            self.dim,
        )?;
        EncoderTower::new(
            self.reference_tower.vocab.clone(),
            self.reference_tower.table.clone(),
            self.dim,
        )?;
        Ok(())
    }
}

impl NameEncoder for DualEncoder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_tower.encode(text, self.dim)
    }

    fn embed_reference(&self, text: &str) -> Result<Vec<f32>> {
        self.reference_tower.encode(text, self.dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tower(corpus: &[&str], max_len: usize, dim: usize) -> EncoderTower {
        let vocab = CharVocab::build(corpus.iter().copied(), max_len);
        // Deterministic synthetic weights: row i gets a distinct direction
        let table: Vec<Vec<f32>> = (0..vocab.size())
            .map(|i| {
                (0..dim)
                    .map(|d| ((i * 31 + d * 7) % 13) as f32 - 6.0)
                    .collect()
            })
            .collect();
        EncoderTower::new(vocab, table, dim).unwrap()
    }

    fn test_encoder() -> DualEncoder {
        let query = tower(&["alice", "bob", "minjun"], 15, 8);
        let reference = tower(&["하린", "지훈", "민준"], 4, 8);
        DualEncoder::new(query, reference, 8)
    }

    #[test]
    fn test_embed_is_unit_norm() {
        let encoder = test_encoder();
        let vec = encoder.embed_query("alice").unwrap();
        assert_eq!(vec.len(), 8);
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_embed_is_deterministic() {
        let encoder = test_encoder();
        let a = encoder.embed_reference("하린").unwrap();
        let b = encoder.embed_reference("하린").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_embed_empty_text_fails() {
        let encoder = test_encoder();
        let err = encoder.embed_query("").unwrap_err();
        assert!(matches!(err, RecommendError::Encoding(_)));
    }

    #[test]
    fn test_unknown_chars_still_encode() {
        // Out-of-vocabulary characters fall back to the unk row
        let encoder = test_encoder();
        let vec = encoder.embed_query("zzz").unwrap();
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tower_shape_validation() {
        let vocab = CharVocab::build(["ab"], 4);
        let short_table = vec![vec![0.0f32; 8]; 2]; // needs vocab.size() == 4 rows
        let err = EncoderTower::new(vocab, short_table, 8).unwrap_err();
        assert!(matches!(err, RecommendError::Model(_)));
    }

    #[test]
    fn test_artifact_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dual_encoder.bin");

        let encoder = test_encoder();
        let before = encoder.embed_query("alice").unwrap();
        encoder.save(&path).unwrap();

        let restored = DualEncoder::from_path(&path).unwrap();
        assert_eq!(restored.dimension(), 8);
        assert_eq!(restored.embed_query("alice").unwrap(), before);
    }

    #[test]
    fn test_missing_artifact_fails() {
        let dir = TempDir::new().unwrap();
        let err = DualEncoder::from_path(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, RecommendError::Model(_)));
    }
}
