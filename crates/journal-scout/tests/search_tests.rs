//! Search integration tests over the sample catalog

mod common;

use common::fixtures::sample_catalog;
use journal_scout::SearchOptions;

fn ids(query: &str, options: &SearchOptions) -> Vec<i64> {
    sample_catalog()
        .search(query, options)
        .iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn test_catalog_shape() {
    let catalog = sample_catalog();
    assert_eq!(catalog.len(), 10);
    assert_eq!(catalog.meta().total_journals, Some(10));
    assert_eq!(catalog.meta().index_fields.len(), 4);
}

#[test]
fn test_title_query_prefers_exact_match() {
    assert_eq!(ids("nature", &SearchOptions::default()), vec![1, 2]);
    assert_eq!(ids("  NATURE ", &SearchOptions::default()), vec![1, 2]);
}

#[test]
fn test_scores_are_additive() {
    let catalog = sample_catalog();
    let scored = catalog.index().search_scored("nature", &SearchOptions::default());
    assert!((scored[0].1 - 1778.1).abs() < 1e-9);
    assert!((scored[1].1 - 771.8375).abs() < 1e-9);
}

#[test]
fn test_acronym_query() {
    assert_eq!(ids("jacs", &SearchOptions::default()), vec![3]);
    // "jac" is an exact acronym of Journal of Applied Crystallography but
    // JACS wins on its bibliometric boosts.
    assert_eq!(ids("jac", &SearchOptions::default()), vec![3, 5]);
}

#[test]
fn test_short_acronym_requires_prefix() {
    assert!(ids("chem", &SearchOptions::default()).is_empty());
    assert_eq!(ids("chemical", &SearchOptions::default()), vec![3]);
}

#[test]
fn test_identifier_queries() {
    assert_eq!(ids("0002-7863", &SearchOptions::default()), vec![3]);
    assert_eq!(ids("1476-4687", &SearchOptions::default()), vec![1]);
    assert_eq!(ids("cn 11-5838", &SearchOptions::default()), vec![6]);
}

#[test]
fn test_min_if_filter() {
    let options = SearchOptions {
        min_if: Some(20.0),
        ..SearchOptions::default()
    };
    assert_eq!(ids("nature", &options), vec![1]);

    // IF given as a string still counts
    let options = SearchOptions {
        min_if: Some(5.5),
        ..SearchOptions::default()
    };
    assert_eq!(ids("pollution", &options), vec![7]);
}

#[test]
fn test_min_if_drops_rows_without_impact_factor() {
    assert_eq!(ids("中国", &SearchOptions::default()), vec![6]);

    let options = SearchOptions {
        min_if: Some(0.0),
        ..SearchOptions::default()
    };
    assert!(ids("中国", &options).is_empty());
    // "n/a" in the dataset is not an impact factor either
    assert!(ids("acta chimica", &options).is_empty());
    assert_eq!(ids("acta chimica", &SearchOptions::default()), vec![9]);
}

#[test]
fn test_limit() {
    let options = SearchOptions {
        limit: 1,
        ..SearchOptions::default()
    };
    assert_eq!(ids("nature", &options), vec![1]);
}

#[test]
fn test_empty_and_unmatched_queries() {
    assert!(ids("", &SearchOptions::default()).is_empty());
    assert!(ids("   ", &SearchOptions::default()).is_empty());
    assert!(ids("zzzzzz", &SearchOptions::default()).is_empty());
}

#[test]
fn test_lookup_by_id_and_title() {
    let catalog = sample_catalog();
    assert_eq!(catalog.find_by_id(9).unwrap().title_str(), "Acta Chimica Sinica");
    assert_eq!(catalog.find_by_title("nature").unwrap().id, 1);
    assert!(catalog.find_by_title("Science").is_none());
}
