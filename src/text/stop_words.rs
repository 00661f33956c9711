// Stop-word sources.
//
// The built-in list comes from the `stop-words` crate (English). A custom
// list can be loaded from a plain text file: one word per line, blank lines
// and `#` comments ignored.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};

/// A set of lowercase words excluded from the subset vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// No stop words at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// The English list shipped with the `stop-words` crate.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parse a stop-word list from text.
    pub fn parse(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a stop-word list from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stop words at {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let sw = StopWords::parse("# common words\nThe\n\n  and  \n#of\n");
        assert_eq!(sw.len(), 2);
        assert!(sw.contains("the"));
        assert!(sw.contains("and"));
        assert!(!sw.contains("of"));
    }

    #[test]
    fn test_english_list_has_common_words() {
        let sw = StopWords::english();
        assert!(sw.contains("the"));
        assert!(sw.contains("and"));
        assert!(!sw.contains("fox"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = StopWords::from_file(Path::new("/nonexistent/stop_words.txt"));
        assert!(result.is_err());
    }
}
