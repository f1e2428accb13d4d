//! HQ field statistics file

mod common;

use common::fixtures::load_fixture;
use journal_scout::stats::{parse_field_stats, sorted_by_index};
use journal_scout::{FieldStatus, StatsSummary};

#[test]
fn test_stats_file_summary() {
    let rows = parse_field_stats(&load_fixture("hq_field_stats.json")).unwrap();
    let summary = StatsSummary::from_rows(&rows);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.declared_sum, 224);
    assert_eq!(summary.parsed_sum, 224);
    assert_eq!(summary.unique_sum, 220);
}

#[test]
fn test_stats_rows_in_index_order() {
    let rows = parse_field_stats(&load_fixture("hq_field_stats.json")).unwrap();
    let statuses: Vec<(u64, FieldStatus)> = sorted_by_index(&rows)
        .iter()
        .map(|r| (r.index, r.status()))
        .collect();

    assert_eq!(
        statuses,
        vec![
            (1, FieldStatus::Matched),
            (2, FieldStatus::MatchedAfterDedup),
            (3, FieldStatus::Mismatched),
        ]
    );
}
