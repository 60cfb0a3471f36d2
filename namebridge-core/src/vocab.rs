//! Character vocabulary for fixed-length tokenization
//!
//! Maps characters to integer ids for the dual encoder. The mapping is
//! frozen at training time and ships inside the model artifact, so the
//! reference side and the query side always agree on ids.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reserved id for padding positions
pub const PAD_ID: u32 = 0;

/// Reserved id for out-of-vocabulary characters
pub const UNK_ID: u32 = 1;

/// Frozen char-to-id mapping with a fixed sequence length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharVocab {
    /// Known characters; ids start at 2 (0 = pad, 1 = unk)
    chars: BTreeMap<char, u32>,
    /// Fixed token sequence length (pad/truncate target)
    max_len: usize,
}

impl CharVocab {
    /// Build a vocabulary from a corpus of texts.
    ///
    /// Characters are sorted before id assignment so the same corpus always
    /// produces the same mapping.
    pub fn build<'a>(texts: impl IntoIterator<Item = &'a str>, max_len: usize) -> Self {
        let mut seen = BTreeSet::new();
        for text in texts {
            seen.extend(text.chars());
        }

        let chars = seen
            .into_iter()
            .enumerate()
            .map(|(i, c)| (c, i as u32 + 2))
            .collect();

        Self { chars, max_len }
    }

    /// Fixed token sequence length
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Total id space, including the pad and unk ids
    pub fn size(&self) -> usize {
        self.chars.len() + 2
    }

    /// Look up the id for a character
    pub fn id_of(&self, c: char) -> u32 {
        self.chars.get(&c).copied().unwrap_or(UNK_ID)
    }

    /// Tokenize text into exactly `max_len` ids.
    ///
    /// Truncates past `max_len` and pads the tail with [`PAD_ID`]. Unknown
    /// characters map to [`UNK_ID`].
    pub fn tokenize(&self, text: &str) -> Vec<u32> {
        let mut ids: Vec<u32> = text
            .chars()
            .take(self.max_len)
            .map(|c| self.id_of(c))
            .collect();
        ids.resize(self.max_len, PAD_ID);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_assigns_sorted_ids() {
        let vocab = CharVocab::build(["cab"], 4);
        // Sorted: a < b < c, ids from 2
        assert_eq!(vocab.id_of('a'), 2);
        assert_eq!(vocab.id_of('b'), 3);
        assert_eq!(vocab.id_of('c'), 4);
        assert_eq!(vocab.size(), 5);
    }

    #[test]
    fn test_tokenize_pads_and_truncates() {
        let vocab = CharVocab::build(["ab"], 4);

        let short = vocab.tokenize("a");
        assert_eq!(short, vec![2, PAD_ID, PAD_ID, PAD_ID]);

        let long = vocab.tokenize("ababab");
        assert_eq!(long.len(), 4);
        assert_eq!(long, vec![2, 3, 2, 3]);
    }

    #[test]
    fn test_tokenize_unknown_chars() {
        let vocab = CharVocab::build(["ab"], 3);
        let ids = vocab.tokenize("axb");
        assert_eq!(ids, vec![2, UNK_ID, 3]);
    }

    #[test]
    fn test_tokenize_empty_is_all_pad() {
        let vocab = CharVocab::build(["ab"], 3);
        assert_eq!(vocab.tokenize(""), vec![PAD_ID; 3]);
    }

    #[test]
    fn test_hangul_chars() {
        let vocab = CharVocab::build(["하린", "지훈"], 4);
        let ids = vocab.tokenize("하린");
        assert_ne!(ids[0], UNK_ID);
        assert_ne!(ids[1], UNK_ID);
        assert_eq!(ids[2], PAD_ID);
    }

    #[test]
    fn test_serialization_round_trip() {
        let vocab = CharVocab::build(["서연", "민준"], 4);
        let bytes = bincode::serialize(&vocab).unwrap();
        let restored: CharVocab = bincode::deserialize(&bytes).unwrap();
        assert_eq!(vocab, restored);
    }
}
