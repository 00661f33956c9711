// Position index — where each subset word occurs in the token stream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::subset::SubsetVocabulary;
use super::vocabulary::Vocabulary;
use super::WordId;
use crate::text::tokenizer::TokenStream;

/// Strictly ascending token positions.
///
/// Positions in one token stream are unique, so merging the sets of two
/// different words never produces duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionSet(Vec<usize>);

impl PositionSet {
    /// Build from arbitrary positions, sorting and deduplicating them.
    pub fn new(mut positions: Vec<usize>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Self(positions)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// Merge `other` into this set, keeping it ascending.
    pub fn merge(&mut self, other: &PositionSet) {
        let mut merged = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        let (a, b) = (&self.0, &other.0);

        while i < a.len() && j < b.len() {
            if a[i] < b[j] {
                merged.push(a[i]);
                i += 1;
            } else if b[j] < a[i] {
                merged.push(b[j]);
                j += 1;
            } else {
                merged.push(a[i]);
                i += 1;
                j += 1;
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);

        self.0 = merged;
    }

    /// Sorted union of two sets.
    pub fn union(&self, other: &PositionSet) -> PositionSet {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}

impl From<Vec<usize>> for PositionSet {
    fn from(positions: Vec<usize>) -> Self {
        Self::new(positions)
    }
}

impl AsRef<[usize]> for PositionSet {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

/// Subset word id → the positions at which it occurs.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    positions: BTreeMap<WordId, PositionSet>,
}

impl PositionIndex {
    /// Scan the token stream once, bucketing each position under its word id
    /// and keeping only subset words.
    pub fn build(stream: &TokenStream, vocabulary: &Vocabulary, subset: &SubsetVocabulary) -> Self {
        let mut buckets: BTreeMap<WordId, Vec<usize>> =
            subset.ids().iter().map(|&id| (id, Vec::new())).collect();

        for (position, token) in stream.tokens.iter().enumerate() {
            if let Some(bucket) = vocabulary.id_of(token).and_then(|id| buckets.get_mut(&id)) {
                // Scanning in stream order keeps every bucket ascending.
                bucket.push(position);
            }
        }

        let positions: BTreeMap<WordId, PositionSet> = buckets
            .into_iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(id, p)| (id, PositionSet(p)))
            .collect();

        debug!(words = positions.len(), "Built position index");

        Self { positions }
    }

    /// Positions of a subset word, or `None` if the id isn't indexed.
    pub fn positions_of(&self, id: WordId) -> Option<&PositionSet> {
        self.positions.get(&id)
    }

    /// Positions of a subset word looked up by its text.
    pub fn positions_of_word(&self, vocabulary: &Vocabulary, word: &str) -> Option<&PositionSet> {
        vocabulary.id_of(word).and_then(|id| self.positions_of(id))
    }

    /// All indexed words, ascending by id.
    pub fn iter(&self) -> impl Iterator<Item = (WordId, &PositionSet)> {
        self.positions.iter().map(|(&id, p)| (id, p))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::stop_words::StopWords;
    use crate::vocab::subset::FrequencyThreshold;

    #[test]
    fn test_merge_keeps_order() {
        let mut a = PositionSet::new(vec![1, 4, 9]);
        a.merge(&PositionSet::new(vec![2, 5, 10, 11]));
        assert_eq!(a.as_slice(), &[1, 2, 4, 5, 9, 10, 11]);
    }

    #[test]
    fn test_merge_with_empty() {
        let mut a = PositionSet::default();
        a.merge(&PositionSet::new(vec![3, 1]));
        assert_eq!(a.as_slice(), &[1, 3]);
    }

    #[test]
    fn test_build_index() {
        let stream = TokenStream::from_tokens(["the", "fox", "jumps", "the", "fox", "runs"]);
        let vocab = Vocabulary::build(&stream);
        let subset = SubsetVocabulary::select(
            &vocab,
            FrequencyThreshold::default(),
            &StopWords::from_words(["the"]),
        )
        .unwrap();
        let index = PositionIndex::build(&stream, &vocab, &subset);

        assert_eq!(index.len(), 3);
        assert_eq!(index.positions_of_word(&vocab, "fox").unwrap().as_slice(), &[1, 4]);
        assert_eq!(index.positions_of_word(&vocab, "jumps").unwrap().as_slice(), &[2]);
        assert_eq!(index.positions_of_word(&vocab, "runs").unwrap().as_slice(), &[5]);
        // Stop words and unknown words are an explicit miss, not an error
        assert!(index.positions_of_word(&vocab, "the").is_none());
        assert!(index.positions_of_word(&vocab, "cat").is_none());
    }
}
