// Comparer strategies — how close are two words' occurrences?
//
// A comparer scores two position lists: a small score means the occurrences
// in `b` track the occurrences in `a` closely, a large score means they're
// spread far apart. Scores are directional; the clump builder depends on
// the argument order, so callers must keep it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Trait for scoring the positional proximity of two position lists.
///
/// Both slices must be sorted ascending. Implementations fail with
/// `InvalidInput` when either side is empty.
pub trait Comparer {
    fn score(&self, a: &[usize], b: &[usize]) -> Result<u64>;

    /// Stable key used in configuration and persisted reports.
    fn key(&self) -> &'static str;
}

/// For every position in `b`, the distance to its nearest neighbor in `a`,
/// averaged and truncated toward zero.
///
/// Walks `b` and binary-searches `a`, so a call costs O(|b| log |a|).
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestNeighborAverageDistance;

impl Comparer for ClosestNeighborAverageDistance {
    fn score(&self, a: &[usize], b: &[usize]) -> Result<u64> {
        require_non_empty(a, b)?;

        let total: u64 = b
            .iter()
            .map(|&p| distance_to_nearest_neighbor(a, p) as u64)
            .sum();

        Ok(total / b.len() as u64)
    }

    fn key(&self) -> &'static str {
        ComparerKind::ClosestNeighborAverageDistance.key()
    }
}

/// Mean of the two directional closest-neighbor scores, truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricClosestNeighborAverageDistance;

impl Comparer for SymmetricClosestNeighborAverageDistance {
    fn score(&self, a: &[usize], b: &[usize]) -> Result<u64> {
        let forward = ClosestNeighborAverageDistance.score(a, b)?;
        let backward = ClosestNeighborAverageDistance.score(b, a)?;
        Ok((forward + backward) / 2)
    }

    fn key(&self) -> &'static str {
        ComparerKind::SymmetricClosestNeighborAverageDistance.key()
    }
}

fn require_non_empty(a: &[usize], b: &[usize]) -> Result<()> {
    if a.is_empty() || b.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "cannot score an empty position list".to_string(),
        ));
    }
    Ok(())
}

/// Distance from `position` to the closest entry of the ascending, non-empty `positions`.
pub fn distance_to_nearest_neighbor(positions: &[usize], position: usize) -> usize {
    let idx = positions.partition_point(|&q| q < position);
    let above = positions.get(idx).map(|&q| q - position);
    let below = idx
        .checked_sub(1)
        .and_then(|i| positions.get(i))
        .map(|&q| position - q);

    match (below, above) {
        (Some(b), Some(a)) => b.min(a),
        (Some(d), None) | (None, Some(d)) => d,
        (None, None) => usize::MAX,
    }
}

/// The closed set of built-in comparer strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ComparerKind {
    #[default]
    ClosestNeighborAverageDistance,
    SymmetricClosestNeighborAverageDistance,
}

impl ComparerKind {
    pub const ALL: [ComparerKind; 2] = [
        ComparerKind::ClosestNeighborAverageDistance,
        ComparerKind::SymmetricClosestNeighborAverageDistance,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ComparerKind::ClosestNeighborAverageDistance => "closest-neighbor-average-distance",
            ComparerKind::SymmetricClosestNeighborAverageDistance => {
                "symmetric-closest-neighbor-average-distance"
            }
        }
    }

    /// The strategy this kind selects.
    pub fn comparer(&self) -> &'static dyn Comparer {
        match self {
            ComparerKind::ClosestNeighborAverageDistance => &ClosestNeighborAverageDistance,
            ComparerKind::SymmetricClosestNeighborAverageDistance => {
                &SymmetricClosestNeighborAverageDistance
            }
        }
    }
}

impl fmt::Display for ComparerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ComparerKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        ComparerKind::ALL
            .into_iter()
            .find(|k| k.key() == s.trim())
            .ok_or_else(|| AnalysisError::InvalidConfiguration(format!("unknown comparer: {s}")))
    }
}
