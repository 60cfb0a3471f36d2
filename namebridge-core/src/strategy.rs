//! Recommendation strategies
//!
//! Two interchangeable ways to recommend k Korean name candidates for an
//! English name: the embedding-backed [`Recommender`](crate::query::Recommender)
//! and the hash-seeded placeholder below. They share only this interface.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{RecommendError, Result};
use crate::reference::Gender;

/// A recommended Korean name candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub korean_name: String,
    pub meaning: Option<String>,
    #[serde(rename = "eraScore")]
    pub trend_score: f32,
    pub gender: Gender,
}

/// Recommend k Korean name candidates for an English name
pub trait RecommendStrategy: Send + Sync {
    fn recommend(&self, english_name: &str, k: usize) -> Result<Vec<Recommendation>>;
}

/// Built-in candidate pool for the placeholder strategy
const CANDIDATE_NAMES: &[&str] = &[
    "하린", "지훈", "민준", "서연", "현우", "지민", "수민", "다은", "예준", "가은", "지아",
    "윤우", "시은",
];

const CANDIDATE_MEANINGS: &[&str] = &[
    "하늘같이 맑고 밝은",
    "지혜롭고 빛나는",
    "백성을 이끄는 지도자",
    "서로를 연모하는 마음",
    "현명하고 우아한",
    "지속되는 아름다움",
    "수려하고 민첩한",
    "모든 이에게 은혜로움",
    "예의 바르고 준수한",
];

/// Deterministic hash-seeded placeholder recommender.
///
/// Samples from a built-in candidate pool with an RNG seeded by the SHA-256
/// of the lowercased English name, so the same input always produces the
/// same candidates. No model, no reference cache.
#[derive(Debug, Default)]
pub struct HashRecommender;

impl HashRecommender {
    pub fn new() -> Self {
        Self
    }
}

impl RecommendStrategy for HashRecommender {
    fn recommend(&self, english_name: &str, k: usize) -> Result<Vec<Recommendation>> {
        let name = english_name.trim();
        if name.is_empty() {
            return Err(RecommendError::invalid_input("english name is empty"));
        }
        if k == 0 {
            return Err(RecommendError::invalid_input("k must be positive"));
        }

        let lowered = name.to_lowercase();
        let mut rng = StdRng::seed_from_u64(seed_for(&lowered));

        let k = k.min(CANDIDATE_NAMES.len());
        let picks = rand::seq::index::sample(&mut rng, CANDIDATE_NAMES.len(), k);

        let mut results = Vec::with_capacity(k);
        for idx in picks.iter() {
            let korean_name = CANDIDATE_NAMES[idx];
            let meaning = CANDIDATE_MEANINGS[rng.gen_range(0..CANDIDATE_MEANINGS.len())];
            let trend_score = hash_unit(&format!("{}{}", korean_name, name));

            results.push(Recommendation {
                korean_name: korean_name.to_string(),
                meaning: Some(meaning.to_string()),
                trend_score,
                gender: Gender::Unknown,
            });
        }

        Ok(results)
    }
}

/// RNG seed from the first 8 bytes of sha256(name)
fn seed_for(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Map a string to a value in [0, 1], rounded to 2 decimals
fn hash_unit(value: &str) -> f32 {
    let digest = Sha256::digest(value.as_bytes());
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&digest[..4]);
    let unit = u32::from_be_bytes(bytes) as f64 / u32::MAX as f64;
    ((unit * 100.0).round() / 100.0) as f32
}
