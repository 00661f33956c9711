// Analysis pipeline — builds every derived structure once, in dependency order.
//
//   TokenStream -> Vocabulary -> SubsetVocabulary -> PositionIndex
//
// The finished Analysis holds all three as immutable values. Similarity
// stacks and clumps are computed on demand against them with whichever
// comparer the configuration selects.

use std::collections::BTreeMap;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clumps::builder::{validate_radius, TopicClumpBuilder};
use crate::clumps::clump::Clump;
use crate::clumps::report::ClumpReport;
use crate::error::Result;
use crate::proximity::comparer::{Comparer, ComparerKind};
use crate::proximity::parameterizer::{ParameterizerKind, DEFAULT_RANK_THRESHOLD};
use crate::proximity::stack::{self, SimilarityStack, SimilarityStackBuilder, WordRank, WordRef};
use crate::text::stop_words::StopWords;
use crate::text::tokenizer::TokenStream;
use crate::vocab::positions::PositionIndex;
use crate::vocab::subset::{FrequencyThreshold, SubsetVocabulary};
use crate::vocab::vocabulary::Vocabulary;
use crate::vocab::WordId;

/// Knobs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Subset-vocabulary frequency threshold (default 5/100000)
    pub threshold: FrequencyThreshold,
    /// Pairwise scoring strategy
    pub comparer: ComparerKind,
    /// Stack-ranking strategy
    pub parameterizer: ParameterizerKind,
    /// Score a stack entry must reach for the words-to-threshold parameterizer
    pub rank_threshold: u64,
    /// Clump merge threshold. No default; clumping needs the caller to pick one.
    pub radius: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: FrequencyThreshold::default(),
            comparer: ComparerKind::default(),
            parameterizer: ParameterizerKind::default(),
            rank_threshold: DEFAULT_RANK_THRESHOLD,
            radius: None,
        }
    }
}

impl AnalysisConfig {
    /// Check everything that can be checked before touching the corpus.
    pub fn validate(&self) -> Result<()> {
        self.threshold.minimum_count(0)?;
        if let Some(radius) = self.radius {
            validate_radius(radius)?;
        }
        Ok(())
    }
}

/// A corpus run through the indexing steps.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub stream: TokenStream,
    pub vocabulary: Vocabulary,
    pub subset: SubsetVocabulary,
    pub positions: PositionIndex,
    pub config: AnalysisConfig,
}

impl Analysis {
    /// Index a token stream. Fails fast on invalid configuration.
    pub fn build(stream: TokenStream, stop_words: &StopWords, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let vocabulary = Vocabulary::build(&stream);
        let subset = SubsetVocabulary::select(&vocabulary, config.threshold, stop_words)?;
        let positions = PositionIndex::build(&stream, &vocabulary, &subset);

        info!(
            tokens = stream.len(),
            discarded = stream.discarded,
            vocabulary = vocabulary.len(),
            subset = subset.len(),
            "Indexed corpus"
        );

        Ok(Self {
            stream,
            vocabulary,
            subset,
            positions,
            config,
        })
    }

    pub fn comparer(&self) -> &'static dyn Comparer {
        self.config.comparer.comparer()
    }

    fn stack_builder(&self) -> SimilarityStackBuilder<'_> {
        SimilarityStackBuilder::new(&self.vocabulary, &self.subset, &self.positions, self.comparer())
    }

    fn clump_builder(&self) -> TopicClumpBuilder<'_> {
        TopicClumpBuilder::new(&self.vocabulary, &self.subset, &self.positions, self.comparer())
    }

    /// Subset words in iteration order.
    pub fn subset_words(&self) -> Vec<&str> {
        self.subset
            .ids()
            .iter()
            .filter_map(|&id| self.vocabulary.word(id))
            .collect()
    }

    pub fn similarity_stack<'w>(
        &self,
        target: impl Into<WordRef<'w>>,
        truncate: Option<usize>,
    ) -> Result<SimilarityStack> {
        self.stack_builder().stack_for(target, truncate)
    }

    pub fn similarity_stacks(
        &self,
        progress: Option<&ProgressBar>,
    ) -> Result<BTreeMap<WordId, SimilarityStack>> {
        self.stack_builder().stacks_for_all(progress)
    }

    /// Rank every subset word with the configured parameterizer.
    pub fn rank_words(&self, progress: Option<&ProgressBar>) -> Result<Vec<WordRank>> {
        let stacks = self.similarity_stacks(progress)?;
        let parameterizer = self.config.parameterizer.parameterizer(self.config.rank_threshold);
        Ok(stack::rank_words(&stacks, parameterizer.as_ref()))
    }

    pub fn clumps(&self, radius: f64) -> Result<Vec<Clump>> {
        self.clump_builder().build(radius)
    }

    pub fn clump_report(&self, radius: f64) -> Result<ClumpReport> {
        self.clump_builder().build_report(radius)
    }
}
