// Error type for the positional-analysis core.
//
// The library pipeline (vocabulary, proximity, clumps) returns these typed
// errors so callers can tell a bad configuration apart from a lookup miss.
// The application layers (config, db, CLI) wrap them in anyhow with context.

/// Errors raised by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A threshold, radius, or strategy key the pipeline can't work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A strategy was handed data it can't score, e.g. an empty position list.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A word or id that isn't part of the subset vocabulary.
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
