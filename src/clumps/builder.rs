// Greedy topic clump builder.
//
// One pass over the subset vocabulary. Each word first tries to join an
// existing clump (in creation order); failing that, it tries to pair up with
// a word that isn't in any clump yet (a "free agent"); failing that, it's
// left out. A word joins when the comparer score is strictly below the
// radius.
//
// The result depends on the iteration order: the same words visited in a
// different order can produce different clumps. Words that never join are
// dropped from the clump list and reported separately.

use tracing::{debug, info};

use super::clump::Clump;
use super::report::ClumpReport;
use crate::error::{AnalysisError, Result};
use crate::proximity::comparer::Comparer;
use crate::vocab::positions::{PositionIndex, PositionSet};
use crate::vocab::subset::SubsetVocabulary;
use crate::vocab::vocabulary::Vocabulary;
use crate::vocab::WordId;

/// A subset word that may still be picked as the first partner of a new clump.
///
/// `available` flips to false once, when the word lands in a clump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeAgent {
    pub id: WordId,
    pub available: bool,
}

impl FreeAgent {
    fn new(id: WordId) -> Self {
        Self {
            id,
            available: true,
        }
    }

    fn consume(&mut self) {
        self.available = false;
    }
}

/// Clumps plus the words that never joined one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClumpRun {
    pub clumps: Vec<Clump>,
    pub dropped: Vec<String>,
}

/// Builds topic clumps from a finished position index.
pub struct TopicClumpBuilder<'a> {
    vocabulary: &'a Vocabulary,
    subset: &'a SubsetVocabulary,
    positions: &'a PositionIndex,
    comparer: &'a dyn Comparer,
}

impl<'a> TopicClumpBuilder<'a> {
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

    /// Clump the subset vocabulary in ascending id order.
    pub fn build(&self, radius: f64) -> Result<Vec<Clump>> {
        Ok(self.run(self.subset.ids(), radius)?.clumps)
    }

    /// Clump the subset vocabulary and package the result with its settings.
    pub fn build_report(&self, radius: f64) -> Result<ClumpReport> {
        let run = self.run(self.subset.ids(), radius)?;
        Ok(ClumpReport {
            clumps: run.clumps,
            dropped: run.dropped,
            radius,
            comparer: self.comparer.key().to_string(),
            subset_size: self.subset.len(),
        })
    }

    /// Clump using an explicit iteration order.
    ///
    /// `order` must list every subset id exactly once. Free agents are
    /// scanned in the same order.
    pub fn build_ordered(&self, order: &[WordId], radius: f64) -> Result<ClumpRun> {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        if sorted != self.subset.ids() {
            return Err(AnalysisError::InvalidConfiguration(
                "iteration order must list every subset word exactly once".to_string(),
            ));
        }
        self.run(order, radius)
    }

    fn run(&self, order: &[WordId], radius: f64) -> Result<ClumpRun> {
        validate_radius(radius)?;

        // Resolve every word up front so the loop below only does scoring.
        let mut words: Vec<(&str, &PositionSet)> = Vec::with_capacity(order.len());
        for &id in order {
            let word = self
                .vocabulary
                .word(id)
                .ok_or_else(|| AnalysisError::NotFound(format!("word id {id}")))?;
            let positions = self
                .positions
                .positions_of(id)
                .ok_or_else(|| AnalysisError::NotFound(format!("positions for '{word}'")))?;
            words.push((word, positions));
        }

        let mut free_agents: Vec<FreeAgent> = order.iter().map(|&id| FreeAgent::new(id)).collect();
        let mut clumps: Vec<Clump> = Vec::new();

        for i in 0..words.len() {
            // Already pulled into a clump as someone's partner.
            if !free_agents[i].available {
                continue;
            }
            let (word, positions) = words[i];

            if let Some(c) = self.find_clump(&clumps, positions, radius)? {
                clumps[c].absorb(word, positions);
                free_agents[i].consume();
                debug!(word, clump = c, "Joined existing clump");
                continue;
            }

            if let Some(f) = self.find_free_agent(&free_agents, &words, i, radius)? {
                let (partner, partner_positions) = words[f];
                clumps.push(Clump::pair(partner, partner_positions, word, positions));
                free_agents[f].consume();
                free_agents[i].consume();
                debug!(word, partner, "Started new clump");
            }
        }

        let dropped: Vec<String> = free_agents
            .iter()
            .zip(&words)
            .filter(|(agent, _)| agent.available)
            .map(|(_, (word, _))| word.to_string())
            .collect();

        info!(
            words = words.len(),
            clumps = clumps.len(),
            dropped = dropped.len(),
            radius,
            comparer = self.comparer.key(),
            "Built topic clumps"
        );

        Ok(ClumpRun { clumps, dropped })
    }

    /// First clump whose positions score under the radius against `positions`.
    fn find_clump(
        &self,
        clumps: &[Clump],
        positions: &PositionSet,
        radius: f64,
    ) -> Result<Option<usize>> {
        for (c, clump) in clumps.iter().enumerate() {
            let score = self
                .comparer
                .score(positions.as_slice(), clump.positions.as_slice())?;
            if (score as f64) < radius {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    /// First available free agent (other than word `i`) within the radius.
    fn find_free_agent(
        &self,
        free_agents: &[FreeAgent],
        words: &[(&str, &PositionSet)],
        i: usize,
        radius: f64,
    ) -> Result<Option<usize>> {
        let positions = words[i].1;
        for (f, agent) in free_agents.iter().enumerate() {
            if f == i || !agent.available {
                continue;
            }
            let score = self
                .comparer
                .score(positions.as_slice(), words[f].1.as_slice())?;
            if (score as f64) < radius {
                return Ok(Some(f));
            }
        }
        Ok(None)
    }
}

/// The radius has to be a finite, non-negative number.
pub fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(AnalysisError::InvalidConfiguration(format!(
            "radius must be a finite, non-negative number (got {radius})"
        )));
    }
    Ok(())
}
