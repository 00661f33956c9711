// Similarity stacks — every subset word scored against one reference word.
//
// A stack lists (word, score) pairs sorted ascending by score. The reference
// word goes in first, so the stable sort keeps it at the top (its distance
// to itself is zero), and ties among the rest keep subset order.
//
// Cost: stacks for the whole subset take V² comparer calls, each
// O(|b| log |a|) for the default comparer. That is the practical limit on
// corpus size.

use std::collections::BTreeMap;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::comparer::Comparer;
use super::parameterizer::Parameterizer;
use crate::error::{AnalysisError, Result};
use crate::vocab::positions::PositionIndex;
use crate::vocab::subset::SubsetVocabulary;
use crate::vocab::vocabulary::Vocabulary;
use crate::vocab::WordId;

/// One row of a similarity stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub word: String,
    pub score: u64,
}

/// Scores of every subset word against a reference word, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityStack {
    entries: Vec<StackEntry>,
}

impl SimilarityStack {
    /// Wrap entries that are already in stack order.
    pub fn from_entries(entries: Vec<StackEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// The reference word, if the stack isn't empty.
    pub fn reference(&self) -> Option<&str> {
        self.entries.first().map(|e| e.word.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A word and its parameterizer rank (`None` if it never qualified).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRank {
    pub word: String,
    pub rank: Option<usize>,
}

/// A subset word, named either by text or by vocabulary id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRef<'a> {
    Word(&'a str),
    Id(WordId),
}

impl<'a> From<&'a str> for WordRef<'a> {
    fn from(word: &'a str) -> Self {
        WordRef::Word(word)
    }
}

impl From<WordId> for WordRef<'_> {
    fn from(id: WordId) -> Self {
        WordRef::Id(id)
    }
}

/// Builds similarity stacks over a finished position index.
pub struct SimilarityStackBuilder<'a> {
    vocabulary: &'a Vocabulary,
    subset: &'a SubsetVocabulary,
    positions: &'a PositionIndex,
    comparer: &'a dyn Comparer,
}

impl<'a> SimilarityStackBuilder<'a> {
    pub fn new(
        vocabulary: &'a Vocabulary,
        subset: &'a SubsetVocabulary,
        positions: &'a PositionIndex,
        comparer: &'a dyn Comparer,
    ) -> Self {
        Self {
            vocabulary,
            subset,
            positions,
            comparer,
        }
    }

    fn resolve(&self, target: WordRef<'_>) -> Result<WordId> {
        let id = match target {
            WordRef::Word(word) => self
                .vocabulary
                .id_of(word)
                .ok_or_else(|| AnalysisError::NotFound(format!("word '{word}'")))?,
            WordRef::Id(id) => id,
        };
        if !self.subset.contains(id) {
            return Err(AnalysisError::NotFound(match target {
                WordRef::Word(word) => format!("word '{word}' is not in the subset vocabulary"),
                WordRef::Id(id) => format!("word id {id} is not in the subset vocabulary"),
            }));
        }
        Ok(id)
    }

    fn label(&self, id: WordId) -> String {
        self.vocabulary.word(id).unwrap_or_default().to_string()
    }

    /// The similarity stack for one word, optionally cut to `truncate` entries.
    pub fn stack_for<'w>(
        &self,
        target: impl Into<WordRef<'w>>,
        truncate: Option<usize>,
    ) -> Result<SimilarityStack> {
        let target_id = self.resolve(target.into())?;
        let target_positions = self
            .positions
            .positions_of(target_id)
            .ok_or_else(|| AnalysisError::NotFound(format!("positions for word id {target_id}")))?;

        // Reference word first, then the rest in subset order.
        let order = std::iter::once(target_id)
            .chain(self.subset.ids().iter().copied().filter(|&id| id != target_id));

        let mut entries = Vec::with_capacity(self.subset.len());
        for id in order {
            let Some(other) = self.positions.positions_of(id) else {
                continue;
            };
            let score = self
                .comparer
                .score(target_positions.as_slice(), other.as_slice())?;
            entries.push(StackEntry {
                word: self.label(id),
                score,
            });
        }

        // sort_by_key is stable: ties keep the order built above
        entries.sort_by_key(|e| e.score);
        if let Some(limit) = truncate {
            entries.truncate(limit);
        }

        debug!(
            word = %self.label(target_id),
            entries = entries.len(),
            "Built similarity stack"
        );

        Ok(SimilarityStack { entries })
    }

    /// Stacks for every subset word, keyed by vocabulary id.
    pub fn stacks_for_all(
        &self,
        progress: Option<&ProgressBar>,
    ) -> Result<BTreeMap<WordId, SimilarityStack>> {
        let mut stacks = BTreeMap::new();
        for &id in self.subset.ids() {
            stacks.insert(id, self.stack_for(id, None)?);
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        info!(
            words = stacks.len(),
            comparer = self.comparer.key(),
            "Built all similarity stacks"
        );

        Ok(stacks)
    }
}

/// Rank every stack's reference word with `parameterizer`.
///
/// Ascending by rank; words with no rank go last. Ties keep the input order.
pub fn rank_words(
    stacks: &BTreeMap<WordId, SimilarityStack>,
    parameterizer: &dyn Parameterizer,
) -> Vec<WordRank> {
    let mut ranks: Vec<WordRank> = stacks
        .values()
        .filter_map(|stack| {
            stack.reference().map(|word| WordRank {
                word: word.to_string(),
                rank: parameterizer.rank(stack),
            })
        })
        .collect();

    ranks.sort_by_key(|r| (r.rank.is_none(), r.rank));
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::comparer::ClosestNeighborAverageDistance;
    use crate::proximity::parameterizer::WordsToThreshold;
    use crate::text::stop_words::StopWords;
    use crate::text::tokenizer::TokenStream;
    use crate::vocab::subset::FrequencyThreshold;

    struct Fixture {
        vocab: Vocabulary,
        subset: SubsetVocabulary,
        index: PositionIndex,
    }

    fn fixture(tokens: &[&str]) -> Fixture {
        let stream = TokenStream::from_tokens(tokens.iter().copied());
        let vocab = Vocabulary::build(&stream);
        let subset = SubsetVocabulary::select(
            &vocab,
            FrequencyThreshold::default(),
            &StopWords::from_words(["the"]),
        )
        .unwrap();
        let index = PositionIndex::build(&stream, &vocab, &subset);
        Fixture { vocab, subset, index }
    }

    impl Fixture {
        fn builder(&self) -> SimilarityStackBuilder<'_> {
            SimilarityStackBuilder::new(
                &self.vocab,
                &self.subset,
                &self.index,
                &ClosestNeighborAverageDistance,
            )
        }
    }

    #[test]
    fn test_stack_is_sorted_with_identity_first() {
        let f = fixture(&["the", "fox", "jumps", "the", "fox", "runs"]);
        let builder = f.builder();
        let stack = builder.stack_for("fox", None).unwrap();

        let words: Vec<&str> = stack.entries().iter().map(|e| e.word.as_str()).collect();
        let scores: Vec<u64> = stack.entries().iter().map(|e| e.score).collect();
        // fox [1,4] vs jumps [2] -> 1; vs runs [5] -> 1
        assert_eq!(words, vec!["fox", "jumps", "runs"]);
        assert_eq!(scores, vec![0, 1, 1]);
    }

    #[test]
    fn test_identity_stays_first_among_zero_scores() {
        // Distinct words never share a position, so only the identity scores 0
        let f = fixture(&["a", "b", "a", "b"]);
        let builder = f.builder();
        let stack = builder.stack_for("b", None).unwrap();
        assert_eq!(stack.reference(), Some("b"));
    }

    #[test]
    fn test_truncate() {
        let f = fixture(&["a", "b", "c", "d"]);
        let builder = f.builder();
        assert_eq!(builder.stack_for("a", Some(2)).unwrap().len(), 2);
        assert_eq!(builder.stack_for("a", Some(10)).unwrap().len(), 4);
        assert_eq!(builder.stack_for("a", Some(0)).unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_word_is_not_found() {
        let f = fixture(&["the", "fox"]);
        let builder = f.builder();
        assert!(matches!(builder.stack_for("cat", None), Err(AnalysisError::NotFound(_))));
        // In the vocabulary, but filtered out as a stop word
        assert!(matches!(builder.stack_for("the", None), Err(AnalysisError::NotFound(_))));
        assert!(matches!(builder.stack_for(99usize, None), Err(AnalysisError::NotFound(_))));
    }

    #[test]
    fn test_stack_by_id_matches_by_word() {
        let f = fixture(&["the", "fox", "jumps", "the", "fox", "runs"]);
        let builder = f.builder();
        let id = f.vocab.id_of("jumps").unwrap();
        assert_eq!(
            builder.stack_for(id, None).unwrap(),
            builder.stack_for("jumps", None).unwrap()
        );
    }

    #[test]
    fn test_stacks_for_all_and_rank() {
        let f = fixture(&["a", "b", "a", "x", "x", "x", "x", "x", "c"]);
        let builder = f.builder();
        let stacks = builder.stacks_for_all(None).unwrap();
        assert_eq!(stacks.len(), 4);

        let ranks = rank_words(&stacks, &WordsToThreshold { threshold: 4 });
        assert_eq!(ranks.len(), 4);
        // Ranked words come before unranked ones
        let first_none = ranks.iter().position(|r| r.rank.is_none()).unwrap_or(ranks.len());
        assert!(ranks[first_none..].iter().all(|r| r.rank.is_none()));
        assert!(ranks[..first_none].windows(2).all(|w| w[0].rank <= w[1].rank));
    }
}
