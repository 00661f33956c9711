// Subset vocabulary — the words frequent enough to analyze.
//
// A word survives if it occurs at least floor(total * numerator / denominator)
// times and isn't a stop word. Survivors are kept in ascending id order so
// every downstream pass iterates them the same way on every run.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::vocabulary::Vocabulary;
use super::WordId;
use crate::error::{AnalysisError, Result};
use crate::text::stop_words::StopWords;

/// Minimum-frequency threshold expressed as a fraction of the corpus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyThreshold {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for FrequencyThreshold {
    fn default() -> Self {
        Self {
            numerator: 5,
            denominator: 100_000,
        }
    }
}

impl FrequencyThreshold {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The minimum count for a corpus of `total_tokens`, truncated toward zero.
    pub fn minimum_count(&self, total_tokens: usize) -> Result<usize> {
        if self.denominator == 0 {
            return Err(AnalysisError::InvalidConfiguration(
                "frequency threshold denominator must be non-zero".to_string(),
            ));
        }
        let scaled = total_tokens as u128 * self.numerator as u128 / self.denominator as u128;
        usize::try_from(scaled).map_err(|_| {
            AnalysisError::InvalidConfiguration(format!(
                "frequency threshold {}/{} overflows for {} tokens",
                self.numerator, self.denominator, total_tokens
            ))
        })
    }
}

/// Ids of the vocabulary entries that passed the threshold and stop-word filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetVocabulary {
    ids: Vec<WordId>,
    minimum_count: usize,
}

impl SubsetVocabulary {
    /// Filter `vocabulary` down to its frequent, non-stop-word entries.
    pub fn select(
        vocabulary: &Vocabulary,
        threshold: FrequencyThreshold,
        stop_words: &StopWords,
    ) -> Result<Self> {
        let minimum_count = threshold.minimum_count(vocabulary.total_tokens())?;

        // entries() is already in id order
        let ids: Vec<WordId> = vocabulary
            .entries()
            .iter()
            .filter(|e| e.count >= minimum_count && !stop_words.contains(&e.word))
            .map(|e| e.id)
            .collect();

        info!(
            vocabulary = vocabulary.len(),
            subset = ids.len(),
            minimum_count,
            "Selected subset vocabulary"
        );

        Ok(Self { ids, minimum_count })
    }

    /// Retained ids, ascending.
    pub fn ids(&self) -> &[WordId] {
        &self.ids
    }

    pub fn contains(&self, id: WordId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Position of `id` within the subset ordering.
    pub fn index_of(&self, id: WordId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// The count a word needed to make it into the subset.
    pub fn minimum_count(&self) -> usize {
        self.minimum_count
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenizer::TokenStream;

    fn vocab_of(tokens: &[&str]) -> Vocabulary {
        Vocabulary::build(&TokenStream::from_tokens(tokens.iter().copied()))
    }

    #[test]
    fn test_minimum_count_truncates() {
        let t = FrequencyThreshold::new(1, 3);
        assert_eq!(t.minimum_count(10).unwrap(), 3);
        assert_eq!(t.minimum_count(2).unwrap(), 0);
        assert_eq!(FrequencyThreshold::default().minimum_count(6).unwrap(), 0);
        assert_eq!(FrequencyThreshold::default().minimum_count(40_000).unwrap(), 2);
    }

    #[test]
    fn test_zero_denominator_is_rejected() {
        let vocab = vocab_of(&["a", "b"]);
        let err = SubsetVocabulary::select(&vocab, FrequencyThreshold::new(1, 0), &StopWords::none())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_select_filters_by_count_and_stop_words() {
        // 10 tokens, threshold 2/10 -> minimum count 2
        let vocab = vocab_of(&["a", "b", "a", "c", "the", "b", "the", "a", "d", "e"]);
        let stop = StopWords::from_words(["the"]);
        let subset = SubsetVocabulary::select(&vocab, FrequencyThreshold::new(2, 10), &stop).unwrap();

        let words: Vec<&str> = subset.ids().iter().map(|&id| vocab.word(id).unwrap()).collect();
        assert_eq!(words, vec!["a", "b"]);
        assert_eq!(subset.minimum_count(), 2);
        assert_eq!(subset.index_of(vocab.id_of("b").unwrap()), Some(1));
        assert!(!subset.contains(vocab.id_of("the").unwrap()));
    }

    #[test]
    fn test_empty_vocabulary_gives_empty_subset() {
        let vocab = vocab_of(&[]);
        let subset =
            SubsetVocabulary::select(&vocab, FrequencyThreshold::default(), &StopWords::none())
                .unwrap();
        assert!(subset.is_empty());
    }
}
