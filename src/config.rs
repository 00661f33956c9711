use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::pipeline::AnalysisConfig;
use crate::proximity::comparer::ComparerKind;
use crate::proximity::parameterizer::ParameterizerKind;
use crate::text::stop_words::StopWords;

pub const DEFAULT_DB_PATH: &str = "./topiclump.db";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Every analysis knob has
/// a default except the clump radius; CLI flags override whatever is set here.
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: AnalysisConfig,
    /// Path of the SQLite run store (TOPICLUMP_DB_PATH)
    pub db_path: String,
    /// Custom stop-word list. When unset the built-in English list is used.
    pub stop_words_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let mut analysis = AnalysisConfig::default();

        if let Some(numerator) = parse_var::<u64>("TOPICLUMP_NUMERATOR")? {
            analysis.threshold.numerator = numerator;
        }
        if let Some(denominator) = parse_var::<u64>("TOPICLUMP_DENOMINATOR")? {
            analysis.threshold.denominator = denominator;
        }
        if let Some(comparer) = parse_var::<ComparerKind>("TOPICLUMP_COMPARER")? {
            analysis.comparer = comparer;
        }
        if let Some(parameterizer) = parse_var::<ParameterizerKind>("TOPICLUMP_PARAMETERIZER")? {
            analysis.parameterizer = parameterizer;
        }
        if let Some(threshold) = parse_var::<u64>("TOPICLUMP_RANK_THRESHOLD")? {
            analysis.rank_threshold = threshold;
        }
        analysis.radius = parse_var::<f64>("TOPICLUMP_RADIUS")?;

        Ok(Self {
            analysis,
            db_path: env::var("TOPICLUMP_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            stop_words_path: env::var("TOPICLUMP_STOP_WORDS").ok().map(PathBuf::from),
        })
    }

    /// Load the configured stop-word list.
    pub fn stop_words(&self) -> Result<StopWords> {
        match &self.stop_words_path {
            Some(path) => StopWords::from_file(path),
            None => Ok(StopWords::english()),
        }
    }

    /// Check that a clump radius is configured and usable.
    pub fn require_radius(&self) -> Result<f64> {
        let Some(radius) = self.analysis.radius else {
            anyhow::bail!(
                "No clump radius set. Pass --radius or set TOPICLUMP_RADIUS in your .env file."
            );
        };
        crate::clumps::builder::validate_radius(radius)?;
        Ok(radius)
    }
}

/// Read and parse an optional environment variable. Unset or empty means `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        _ => Ok(None),
    }
}
