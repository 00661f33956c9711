// Clump — a group of words plus the union of their positions.

use serde::{Deserialize, Serialize};

use crate::vocab::positions::PositionSet;

/// A topic clump.
///
/// Grows monotonically while a run is in progress: members are only ever
/// appended, and `positions` is always the sorted union of every member's
/// own positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clump {
    /// Member words, in the order they joined
    pub members: Vec<String>,
    /// Sorted union of all members' positions
    pub positions: PositionSet,
}

impl Clump {
    /// Start a clump from two words: the free agent first, then the word that
    /// matched it.
    pub fn pair(
        first: &str,
        first_positions: &PositionSet,
        second: &str,
        second_positions: &PositionSet,
    ) -> Self {
        Self {
            members: vec![first.to_string(), second.to_string()],
            positions: first_positions.union(second_positions),
        }
    }

    /// Add a word and fold its positions in.
    pub fn absorb(&mut self, word: &str, positions: &PositionSet) {
        self.members.push(word.to_string());
        self.positions.merge(positions);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.members.iter().any(|m| m == word)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
