// Positional proximity — pairwise scoring strategies and similarity stacks.

pub mod comparer;
pub mod parameterizer;
pub mod stack;
