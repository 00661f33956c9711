// Parameterizer strategies — reduce a similarity stack to one comparable number.
//
// Used to rank words against each other by how quickly their similarity
// decays. The first stack entry is the word compared with itself and is
// always skipped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stack::SimilarityStack;
use crate::error::AnalysisError;

/// Default score a stack entry must reach for `WordsToThreshold`.
pub const DEFAULT_RANK_THRESHOLD: u64 = 1000;

/// Trait for turning a sorted similarity stack into a ranking scalar.
pub trait Parameterizer {
    /// `None` means the stack has no entry that qualifies.
    fn rank(&self, stack: &SimilarityStack) -> Option<usize>;
}

/// How many words, past the identity entry, it takes for the score to hit
/// the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordsToThreshold {
    pub threshold: u64,
}

impl Default for WordsToThreshold {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RANK_THRESHOLD,
        }
    }
}

impl Parameterizer for WordsToThreshold {
    fn rank(&self, stack: &SimilarityStack) -> Option<usize> {
        stack
            .entries()
            .iter()
            .skip(1)
            .position(|entry| entry.score >= self.threshold)
    }
}

/// The closed set of built-in parameterizer strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterizerKind {
    #[default]
    WordsToThreshold,
}

impl ParameterizerKind {
    pub fn key(&self) -> &'static str {
        match self {
            ParameterizerKind::WordsToThreshold => "words-to-threshold",
        }
    }

    /// Build the strategy, using `threshold` where the strategy takes one.
    pub fn parameterizer(&self, threshold: u64) -> Box<dyn Parameterizer> {
        match self {
            ParameterizerKind::WordsToThreshold => Box::new(WordsToThreshold { threshold }),
        }
    }
}

impl fmt::Display for ParameterizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ParameterizerKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "words-to-threshold" => Ok(ParameterizerKind::WordsToThreshold),
            other => Err(AnalysisError::InvalidConfiguration(format!(
                "unknown parameterizer: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::stack::StackEntry;

    fn stack(scores: &[u64]) -> SimilarityStack {
        SimilarityStack::from_entries(
            scores
                .iter()
                .enumerate()
                .map(|(i, &score)| StackEntry {
                    word: format!("w{i}"),
                    score,
                })
                .collect(),
        )
    }

    #[test]
    fn test_rank_skips_identity() {
        let p = WordsToThreshold::default();
        // identity, then 10, 500, 1000 -> index 2 among the non-identity entries
        assert_eq!(p.rank(&stack(&[0, 10, 500, 1000, 4000])), Some(2));
    }

    #[test]
    fn test_rank_first_entry_over_threshold() {
        let p = WordsToThreshold { threshold: 5 };
        assert_eq!(p.rank(&stack(&[0, 7, 9])), Some(0));
    }

    #[test]
    fn test_rank_none_when_threshold_never_reached() {
        let p = WordsToThreshold::default();
        assert_eq!(p.rank(&stack(&[0, 10, 999])), None);
        assert_eq!(p.rank(&stack(&[0])), None);
        assert_eq!(p.rank(&stack(&[])), None);
    }

    #[test]
    fn test_identity_entry_never_counts() {
        let p = WordsToThreshold { threshold: 0 };
        assert_eq!(p.rank(&stack(&[0])), None);
        assert_eq!(p.rank(&stack(&[0, 0])), Some(0));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(
            "words-to-threshold".parse::<ParameterizerKind>().unwrap(),
            ParameterizerKind::WordsToThreshold
        );
        assert!("median".parse::<ParameterizerKind>().is_err());
    }
}
