//! Dual-encoder embedding module
//!
//! Maps English query names and Korean reference names into a shared
//! unit-norm embedding space for similarity lookup.

mod discovery;
mod dual;
mod engine;

pub use discovery::find_model_path;
pub use dual::{DualEncoder, EncoderTower, ARTIFACT_FORMAT_VERSION};
pub use engine::EmbeddingEngine;

use crate::error::Result;

/// A frozen text encoder over a shared embedding space.
///
/// Tokenization (charset, max length, pad/unknown handling) is part of the
/// encoder's contract and is versioned together with the model weights, so
/// reference encoding and query encoding can never drift apart.
pub trait NameEncoder: Send + Sync {
    /// Embedding dimension D
    fn dimension(&self) -> usize;

    /// Embed an English query name into a unit-norm vector of length D
    fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a Korean reference name into a unit-norm vector of length D
    fn embed_reference(&self, text: &str) -> Result<Vec<f32>>;
}
