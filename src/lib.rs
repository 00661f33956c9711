// topiclump: positional topic discovery for a single text corpus.
//
// This is the library root. Data flows down the modules in this order:
// text -> vocab -> proximity -> clumps, with `pipeline` wiring the steps
// together and `db` / `output` handling persistence and display.

pub mod clumps;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod proximity;
pub mod text;
pub mod vocab;

#[cfg(feature = "sqlite")]
pub mod db;

pub use error::AnalysisError;
