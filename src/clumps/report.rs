// ClumpReport — the persisted result of one clumping run.
//
// Stored as JSON, both as standalone files and inside the run store. The
// only promise about the format is that it restores the same clumps, with
// the same members and positions in the same order.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::clump::Clump;

/// Clumps from one run plus the settings that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClumpReport {
    /// Clumps in creation order
    pub clumps: Vec<Clump>,
    /// Subset words that ended up in no clump
    #[serde(default)]
    pub dropped: Vec<String>,
    /// Merge threshold the run used
    pub radius: f64,
    /// Key of the comparer strategy
    pub comparer: String,
    /// Number of words in the subset vocabulary
    pub subset_size: usize,
}

impl ClumpReport {
    /// Words across all clumps.
    pub fn clumped_word_count(&self) -> usize {
        self.clumps.iter().map(Clump::len).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize clump report")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse clump report")
    }

    /// Write the report to a JSON file, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory for {}", path.display()))?;
            }
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write clump report to {}", path.display()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read clump report at {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::positions::PositionSet;

    fn sample() -> ClumpReport {
        ClumpReport {
            clumps: vec![
                Clump {
                    members: vec!["jumps".to_string(), "fox".to_string(), "runs".to_string()],
                    positions: PositionSet::new(vec![1, 2, 4, 5]),
                },
                Clump {
                    members: vec!["river".to_string(), "bank".to_string()],
                    positions: PositionSet::new(vec![10, 12, 30]),
                },
            ],
            dropped: vec!["lonely".to_string()],
            radius: 3.0,
            comparer: "closest-neighbor-average-distance".to_string(),
            subset_size: 6,
        }
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample();
        let restored = ClumpReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(restored, report);
        assert_eq!(restored.clumped_word_count(), 5);
    }

    #[test]
    fn test_positions_serialize_as_plain_list() {
        let json = serde_json::to_value(&sample()).unwrap();
        assert_eq!(json["clumps"][0]["positions"], serde_json::json!([1, 2, 4, 5]));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("topiclump-report-{}", std::process::id()))
            .join("report.json");
        let report = sample();
        report.save_to_file(&path).unwrap();
        let restored = ClumpReport::load_from_file(&path).unwrap();
        assert_eq!(restored, report);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(ClumpReport::from_json("{not json").is_err());
    }
}
