//! Namebridge Core
//!
//! Korean-name recommendation engine: a character-level dual encoder maps
//! English names and Korean names into a shared unit-norm embedding space,
//! and a precomputed reference cache answers top-k similarity queries.
//!
//! ## Features
//!
//! - **Dual-encoder lookup** - frozen per-character embedding towers with the
//!   vocabulary versioned inside the model artifact
//! - **Reference cache** - the full embedding matrix built once, swapped
//!   atomically on rebuild, read lock-free by queries
//! - **Stable top-k** - deterministic results with ties broken by insertion
//!   order
//! - **Hash placeholder** - a model-free strategy behind the same interface
//! - **RocksDB history** - persistence for user-saved name choices
//!
//! ## Example
//!
//! ```ignore
//! use namebridge_core::{DualEncoder, EmbeddingEngine, Recommender};
//! use std::sync::Arc;
//!
//! let encoder = DualEncoder::from_path(&model_path)?;
//! let engine = Arc::new(EmbeddingEngine::new(Arc::new(encoder)));
//!
//! let recommender = Recommender::new(engine);
//! recommender.build_cache(&reference_rows)?;
//!
//! for m in recommender.query("Alice", 3)? {
//!     println!("{} ({:.4})", m.entry.korean_name, m.score);
//! }
//! ```

pub mod encoder;
pub mod error;
pub mod history;
pub mod query;
pub mod reference;
pub mod strategy;
pub mod vocab;

// Re-exports for convenience
pub use encoder::{find_model_path, DualEncoder, EmbeddingEngine, EncoderTower, NameEncoder};
pub use error::{RecommendError, Result};
pub use history::{HistoryRecord, HistoryStore, DEFAULT_LIST_LIMIT};
pub use query::{QueryMatch, Recommender};
pub use reference::{Gender, ReferenceCache, ReferenceEntry, ReferenceRow};
pub use strategy::{HashRecommender, Recommendation, RecommendStrategy};
pub use vocab::CharVocab;
