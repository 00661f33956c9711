// Data models — Rust structs that map to database rows.

use serde::{Deserialize, Serialize};

use crate::clumps::report::ClumpReport;

/// A saved clumping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRun {
    pub id: i64,
    pub label: String,
    pub corpus: Option<String>,
    pub created_at: String,
    pub report: ClumpReport,
}
