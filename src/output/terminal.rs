// Colored terminal output for vocabularies, stacks, ranks, and clumps.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::clumps::report::ClumpReport;
#[cfg(feature = "sqlite")]
use crate::db::models::StoredRun;
use crate::pipeline::Analysis;
use crate::proximity::stack::{SimilarityStack, WordRank};

/// Widest member list shown on one line before it gets cut.
const MEMBER_PREVIEW_CHARS: usize = 100;

/// Summarize the vocabulary and subset an analysis was built on.
pub fn display_vocabulary_summary(analysis: &Analysis) {
    println!("\n{}", "=== Vocabulary ===".bold());
    println!(
        "  Tokens: {} kept, {} discarded",
        analysis.stream.len(),
        analysis.stream.discarded
    );
    println!("  Distinct words: {}", analysis.vocabulary.len());
    println!(
        "  Subset vocabulary: {} words (minimum count {}, threshold {}/{})",
        analysis.subset.len(),
        analysis.subset.minimum_count(),
        analysis.config.threshold.numerator,
        analysis.config.threshold.denominator,
    );

    let mut counted: Vec<(&str, usize)> = analysis
        .subset
        .ids()
        .iter()
        .filter_map(|&id| analysis.vocabulary.get(id))
        .map(|e| (e.word.as_str(), e.count))
        .collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    if !counted.is_empty() {
        println!("\n  Most frequent subset words:");
        for (word, count) in counted.iter().take(15) {
            println!("    {:<24} {}", word, count.to_string().dimmed());
        }
    }
    println!();
}

/// Display one similarity stack.
pub fn display_stack(word: &str, stack: &SimilarityStack) {
    println!(
        "\n{}",
        format!("=== Similarity stack for \"{word}\" ({} words) ===", stack.len()).bold()
    );
    println!();

    for (i, entry) in stack.entries().iter().enumerate() {
        let score = colorize_score(entry.score);
        println!("  {:>4}. {:<24} {}", i + 1, entry.word, score);
    }
    println!();
}

/// Display words ranked by how quickly their similarity decays.
pub fn display_ranks(ranks: &[WordRank], top: Option<usize>) {
    if ranks.is_empty() {
        println!("No words in the subset vocabulary to rank.");
        return;
    }

    println!("\n{}", format!("=== Word ranks ({} words) ===", ranks.len()).bold());
    println!();

    let shown = top.unwrap_or(ranks.len());
    for (i, rank) in ranks.iter().take(shown).enumerate() {
        let value = match rank.rank {
            Some(r) => r.to_string().normal(),
            None => "never".dimmed(),
        };
        println!("  {:>4}. {:<24} {}", i + 1, rank.word, value);
    }

    let unranked = ranks.iter().filter(|r| r.rank.is_none()).count();
    if unranked > 0 {
        println!(
            "\n  {} words never reached the rank threshold",
            unranked.to_string().yellow()
        );
    }
    println!();
}

/// Display the clumps of one run.
pub fn display_clumps(report: &ClumpReport) {
    println!(
        "\n{}",
        format!(
            "=== Topic clumps ({} clumps, radius {}, {}) ===",
            report.clumps.len(),
            report.radius,
            report.comparer
        )
        .bold()
    );
    println!();

    if report.clumps.is_empty() {
        println!("  No clumps formed. Try a larger radius.");
    }

    for (i, clump) in report.clumps.iter().enumerate() {
        let members = super::truncate_chars(&clump.members.join(", "), MEMBER_PREVIEW_CHARS);
        println!(
            "  {:>3}. {} {}",
            i + 1,
            format!("[{} words, {} positions]", clump.len(), clump.positions.len()).bright_blue(),
            members
        );
    }

    println!(
        "\n  {} of {} subset words clumped, {} dropped",
        report.clumped_word_count().to_string().bright_green(),
        report.subset_size,
        report.dropped.len().to_string().dimmed()
    );
    println!();
}

/// Display saved runs.
#[cfg(feature = "sqlite")]
pub fn display_runs(runs: &[StoredRun]) {
    if runs.is_empty() {
        println!("No saved runs yet. Run `topiclump clump <file> --radius R --save` first.");
        return;
    }

    println!("\n{}", format!("=== Saved runs ({}) ===", runs.len()).bold());
    println!();
    println!(
        "  {:>5}  {:<24} {:>8}  {:>7}  {:<19}",
        "Id".dimmed(),
        "Label".dimmed(),
        "Radius".dimmed(),
        "Clumps".dimmed(),
        "Created".dimmed(),
    );
    println!("  {}", "-".repeat(70).dimmed());

    for run in runs {
        println!(
            "  {:>5}  {:<24} {:>8}  {:>7}  {:<19}",
            run.id,
            super::truncate_chars(&run.label, 21),
            run.report.radius,
            run.report.clumps.len(),
            run.created_at,
        );
    }
    println!();
}

/// Color a proximity score: close words green, distant ones dimmed.
fn colorize_score(score: u64) -> colored::ColoredString {
    let text = score.to_string();
    match score {
        0..=9 => text.bright_green(),
        10..=99 => text.bright_yellow(),
        100..=999 => text.normal(),
        _ => text.dimmed(),
    }
}
