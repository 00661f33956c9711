// Corpus splitter — turns raw text into an ordered stream of cleaned words.
//
// Lines are split on single spaces. Each fragment is lowercased, scrubbed of
// punctuation, and trimmed of surrounding apostrophes (inner apostrophes stay,
// so contractions like "don't" survive). Fragments that still contain anything
// other than letters and apostrophes are discarded and counted.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex_lite::Regex;
use tracing::debug;

/// Characters scrubbed from every fragment. The apostrophe is handled separately.
const PUNCTUATION: [char; 12] = ['(', ')', ':', ';', ',', '-', '!', '.', '?', '/', '"', '*'];

/// Final shape check a cleaned fragment must pass to become a token.
const WORD_PATTERN: &str = "^[a-z']+$";

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| Regex::new(WORD_PATTERN).expect("word pattern is a valid regex"))
}

/// An ordered sequence of cleaned, lowercase word tokens.
///
/// A token's position is its index in `tokens`. `discarded` counts the
/// fragments the splitter threw away, so threshold arithmetic can be based
/// on the size of the whole text rather than only the kept words.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    pub tokens: Vec<String>,
    pub discarded: usize,
}

impl TokenStream {
    /// Wrap an already-cleaned token list.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            discarded: 0,
        }
    }

    /// Split raw text into tokens.
    pub fn from_text(text: &str) -> Self {
        let mut stream = TokenStream::default();

        for line in text.lines() {
            for fragment in line.split(' ') {
                if fragment.trim().is_empty() {
                    continue;
                }
                match clean_word(fragment) {
                    Some(word) => stream.tokens.push(word),
                    None => stream.discarded += 1,
                }
            }
        }

        debug!(
            tokens = stream.tokens.len(),
            discarded = stream.discarded,
            "Split text into tokens"
        );

        stream
    }

    /// Read and split a text file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus at {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Kept tokens plus discarded fragments.
    pub fn total_count(&self) -> usize {
        self.tokens.len() + self.discarded
    }
}

/// Clean a single space-delimited fragment.
///
/// Returns `None` if what's left after scrubbing isn't a plain word.
pub fn clean_word(fragment: &str) -> Option<String> {
    let lowered = fragment.to_lowercase();
    let scrubbed: String = lowered
        .chars()
        .filter(|c| !PUNCTUATION.contains(c) && *c != '\n' && *c != '\r')
        .collect();
    let word = scrubbed.trim().trim_matches('\'');

    if word_regex().is_match(word) {
        Some(word.to_string())
    } else {
        None
    }
}
