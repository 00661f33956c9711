// Unit tests for the greedy topic clump builder.
//
// The builder is order sensitive on purpose: the same words visited in a
// different order can clump differently. These tests pin the exact output
// for a fixed order and check the invariants that hold for every order.

use std::collections::HashSet;

use topiclump::clumps::builder::TopicClumpBuilder;
use topiclump::pipeline::{Analysis, AnalysisConfig};
use topiclump::proximity::comparer::{ClosestNeighborAverageDistance, ComparerKind};
use topiclump::text::stop_words::StopWords;
use topiclump::text::tokenizer::TokenStream;
use topiclump::AnalysisError;

fn analysis(text: &str, comparer: ComparerKind) -> Analysis {
    Analysis::build(
        TokenStream::from_text(text),
        &StopWords::from_words(["the", "and", "of", "z"]),
        AnalysisConfig {
            comparer,
            ..AnalysisConfig::default()
        },
    )
    .unwrap()
}

const STORY: &str = "the river bank flooded and the river rose over the bank \
    while the market sold bread and the baker sold bread of every kind \
    then the river fell and the bank dried and the market opened again";

// ============================================================
// Invariants
// ============================================================

#[test]
fn no_word_appears_in_two_clumps() {
    for comparer in ComparerKind::ALL {
        let analysis = analysis(STORY, comparer);
        for radius in [0.0, 1.0, 2.5, 5.0, 10.0, 40.0, 1000.0] {
            let clumps = analysis.clumps(radius).unwrap();
            let mut seen = HashSet::new();
            for clump in &clumps {
                assert!(clump.len() >= 2);
                for member in &clump.members {
                    assert!(
                        seen.insert(member.clone()),
                        "{member} appears twice at radius {radius} with {comparer}"
                    );
                }
            }
        }
    }
}

#[test]
fn clump_positions_are_union_of_members() {
    let analysis = analysis(STORY, ComparerKind::default());
    for clump in analysis.clumps(8.0).unwrap() {
        let mut expected: Vec<usize> = clump
            .members
            .iter()
            .flat_map(|m| {
                analysis
                    .positions
                    .positions_of_word(&analysis.vocabulary, m)
                    .unwrap()
                    .as_slice()
                    .to_vec()
            })
            .collect();
        expected.sort_unstable();
        assert_eq!(clump.positions.as_slice(), expected.as_slice());
    }
}

#[test]
fn clumped_plus_dropped_covers_subset() {
    let analysis = analysis(STORY, ComparerKind::default());
    let report = analysis.clump_report(6.0).unwrap();
    assert_eq!(
        report.clumped_word_count() + report.dropped.len(),
        analysis.subset.len()
    );
    for word in &report.dropped {
        assert!(report.clumps.iter().all(|c| !c.contains(word)));
    }
}

#[test]
fn zero_radius_on_distinct_positions_yields_nothing() {
    let analysis = analysis(STORY, ComparerKind::default());
    let report = analysis.clump_report(0.0).unwrap();
    assert!(report.clumps.is_empty());
    assert_eq!(report.dropped.len(), analysis.subset.len());
}

#[test]
fn huge_radius_clumps_everything_together() {
    // Every score is below the radius, so the first pair seeds a clump and
    // every later word joins it.
    let analysis = analysis(STORY, ComparerKind::default());
    let clumps = analysis.clumps(1.0e9).unwrap();
    assert_eq!(clumps.len(), 1);
    assert_eq!(clumps[0].len(), analysis.subset.len());
}

#[test]
fn result_is_reproducible() {
    let a = analysis(STORY, ComparerKind::default()).clumps(6.0).unwrap();
    let b = analysis(STORY, ComparerKind::default()).clumps(6.0).unwrap();
    assert_eq!(a, b);
}

// ============================================================
// Order sensitivity
// ============================================================

#[test]
fn reversing_iteration_order_changes_clumps() {
    // a=0, b=3, c=6. a-b and b-c are within radius 4, a-c is not.
    let analysis = analysis("a z z b z z c", ComparerKind::default());
    let builder = TopicClumpBuilder::new(
        &analysis.vocabulary,
        &analysis.subset,
        &analysis.positions,
        &ClosestNeighborAverageDistance,
    );

    let forward: Vec<usize> = analysis.subset.ids().to_vec();
    let backward: Vec<usize> = forward.iter().rev().copied().collect();

    let f = builder.build_ordered(&forward, 4.0).unwrap();
    let b = builder.build_ordered(&backward, 4.0).unwrap();

    assert_eq!(f.clumps[0].members, vec!["b", "a"]);
    assert_eq!(b.clumps[0].members, vec!["b", "c"]);
    assert_ne!(f.clumps, b.clumps);
}

// ============================================================
// Configuration errors
// ============================================================

#[test]
fn invalid_radius_fails_before_processing() {
    let analysis = analysis(STORY, ComparerKind::default());
    for radius in [-0.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
        assert!(matches!(
            analysis.clumps(radius),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn empty_corpus_yields_no_clumps() {
    let analysis = analysis("", ComparerKind::default());
    assert!(analysis.clumps(5.0).unwrap().is_empty());
}
