// Database queries — saving, loading, and listing clumping runs.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::StoredRun;
use crate::clumps::report::ClumpReport;

const RUN_COLUMNS: &str = "id, label, corpus, created_at, report_json";

/// Store a clump report and return the new run's id.
pub fn save_run(
    conn: &Connection,
    label: &str,
    corpus: Option<&str>,
    report: &ClumpReport,
) -> Result<i64> {
    let report_json = serde_json::to_string(report).context("Failed to serialize clump report")?;
    let created_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO clump_runs
            (label, corpus, comparer, radius, subset_size, clump_count, report_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            label,
            corpus,
            report.comparer,
            report.radius,
            report.subset_size as i64,
            report.clumps.len() as i64,
            report_json,
            created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Load a single run by id.
pub fn get_run(conn: &Connection, id: i64) -> Result<Option<StoredRun>> {
    let mut stmt = conn.prepare(&format!("SELECT {RUN_COLUMNS} FROM clump_runs WHERE id = ?1"))?;
    let raw = stmt.query_row(params![id], raw_run).optional()?;
    raw.map(into_stored_run).transpose()
}

/// All runs, newest first.
pub fn list_runs(conn: &Connection) -> Result<Vec<StoredRun>> {
    let mut stmt = conn.prepare(&format!("SELECT {RUN_COLUMNS} FROM clump_runs ORDER BY id DESC"))?;
    let raws = stmt
        .query_map([], raw_run)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(into_stored_run).collect()
}

/// Delete a run. Returns whether a row was removed.
pub fn delete_run(conn: &Connection, id: i64) -> Result<bool> {
    let removed = conn.execute("DELETE FROM clump_runs WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

/// Number of stored runs.
pub fn run_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM clump_runs", [], |row| row.get(0))?;
    Ok(count)
}

/// Row columns before the report JSON is parsed.
struct RawRun {
    id: i64,
    label: String,
    corpus: Option<String>,
    created_at: String,
    report_json: String,
}

fn raw_run(row: &Row<'_>) -> rusqlite::Result<RawRun> {
    Ok(RawRun {
        id: row.get(0)?,
        label: row.get(1)?,
        corpus: row.get(2)?,
        created_at: row.get(3)?,
        report_json: row.get(4)?,
    })
}

fn into_stored_run(raw: RawRun) -> Result<StoredRun> {
    let report = ClumpReport::from_json(&raw.report_json)
        .with_context(|| format!("Stored run {} has a corrupt report", raw.id))?;
    Ok(StoredRun {
        id: raw.id,
        label: raw.label,
        corpus: raw.corpus,
        created_at: raw.created_at,
        report,
    })
}
