// Vocabulary indexing — unique words, the frequency-filtered subset, and the
// per-word position index the proximity strategies work on.

pub mod positions;
pub mod subset;
pub mod vocabulary;

/// Stable integer id of a vocabulary entry (first-occurrence order).
pub type WordId = usize;
