// Topic clumps — greedy grouping of positionally correlated words.

pub mod builder;
pub mod clump;
pub mod report;
