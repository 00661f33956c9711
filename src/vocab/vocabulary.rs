// Unique vocabulary with word counts.
//
// Ids are handed out in order of first occurrence, so the same token stream
// always produces the same ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::WordId;
use crate::text::tokenizer::TokenStream;

/// One distinct word and how many times it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: WordId,
    pub word: String,
    pub count: usize,
}

/// Every distinct word in a token stream.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    ids: HashMap<String, WordId>,
    total_tokens: usize,
}

impl Vocabulary {
    /// Index a token stream. An empty stream yields an empty vocabulary.
    pub fn build(stream: &TokenStream) -> Self {
        let mut entries: Vec<VocabularyEntry> = Vec::new();
        let mut ids: HashMap<String, WordId> = HashMap::new();

        for token in &stream.tokens {
            match ids.get(token).copied() {
                Some(id) => entries[id].count += 1,
                None => {
                    let id = entries.len();
                    ids.insert(token.clone(), id);
                    entries.push(VocabularyEntry {
                        id,
                        word: token.clone(),
                        count: 1,
                    });
                }
            }
        }

        Self {
            entries,
            ids,
            total_tokens: stream.total_count(),
        }
    }

    /// All entries, in id order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn get(&self, id: WordId) -> Option<&VocabularyEntry> {
        self.entries.get(id)
    }

    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.ids.get(word).copied()
    }

    pub fn word(&self, id: WordId) -> Option<&str> {
        self.entries.get(id).map(|e| e.word.as_str())
    }

    pub fn count_of(&self, word: &str) -> usize {
        self.id_of(word).map_or(0, |id| self.entries[id].count)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens in the stream, including fragments discarded by the splitter.
    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }
}
