//! Ranked instant search over an in-memory journal snapshot.
//!
//! Ranking is additive: exact title / identifier matches dominate, then
//! prefix matches, acronym matches, substring matches, and finally small
//! bibliometric boosts (impact factor, JCR Q1, CAS rank 1).

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::journal::{JournalId, JournalRow};
use crate::normalize::{haystack, is_abbr_query, normalize_abbr_query, title_abbr_variants};

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 12;

/// Acronym queries up to this length only match by prefix.
const SHORT_ABBR_MAX_LEN: usize = 4;

/// Score weights.
pub mod weights {
    pub const TITLE_EXACT: f64 = 1000.0;
    pub const IDENTIFIER_EXACT: f64 = 950.0;
    pub const TITLE_PREFIX: f64 = 450.0;
    pub const IDENTIFIER_PREFIX: f64 = 330.0;
    pub const ABBR_EXACT: f64 = 280.0;
    pub const ABBR_PREFIX: f64 = 220.0;
    pub const TITLE_CONTAINS: f64 = 180.0;
    pub const HAYSTACK_CONTAINS: f64 = 70.0;
    pub const IMPACT_FACTOR_CAP: f64 = 80.0;
    pub const IMPACT_FACTOR_DIVISOR: f64 = 8.0;
    pub const JCR_Q1: f64 = 40.0;
    pub const CAS_RANK_ONE: f64 = 30.0;
}

/// Substring tests only kick in from this many characters.
const MIN_CONTAINS_LEN: usize = 3;

/// Search parameters supplied by the caller for each query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of rows returned
    pub limit: usize,
    /// Drop rows whose impact factor is missing or below this threshold
    pub min_if: Option<f64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            min_if: None,
        }
    }
}

/// A row plus its memoized comparison strings.
///
/// The lowercased identifiers are computed up front; the haystack and the
/// abbreviation variants on first use. Both are pure functions of the row.
#[derive(Debug)]
pub struct IndexedJournal {
    row: JournalRow,
    title: String,
    issn: String,
    eissn: String,
    cn_number: String,
    haystack: OnceLock<String>,
    abbr_variants: OnceLock<BTreeSet<String>>,
}

impl IndexedJournal {
    pub fn new(row: JournalRow) -> Self {
        Self {
            title: row.title_str().to_lowercase(),
            issn: row.issn_str().to_lowercase(),
            eissn: row.eissn_str().to_lowercase(),
            cn_number: row.cn_number_str().to_lowercase(),
            haystack: OnceLock::new(),
            abbr_variants: OnceLock::new(),
            row,
        }
    }

    pub fn row(&self) -> &JournalRow {
        &self.row
    }

    pub fn haystack(&self) -> &str {
        self.haystack.get_or_init(|| haystack(&self.row))
    }

    pub fn abbr_variants(&self) -> &BTreeSet<String> {
        self.abbr_variants
            .get_or_init(|| title_abbr_variants(self.row.title_str()))
    }

    fn identifiers(&self) -> [&str; 3] {
        [&self.issn, &self.eissn, &self.cn_number]
    }

    fn any_abbr_starts_with(&self, q_abbr: &str) -> bool {
        self.abbr_variants().iter().any(|a| a.starts_with(q_abbr))
    }
}

/// A prepared query.
#[derive(Debug, Clone)]
struct PreparedQuery {
    lower: String,
    abbr: String,
    use_abbr: bool,
}

impl PreparedQuery {
    fn new(trimmed: &str) -> Self {
        let abbr = normalize_abbr_query(trimmed);
        Self {
            lower: trimmed.to_lowercase(),
            use_abbr: is_abbr_query(&abbr),
            abbr,
        }
    }

    fn short_abbr_mode(&self) -> bool {
        self.use_abbr && self.abbr.len() <= SHORT_ABBR_MAX_LEN
    }
}

/// Search index over a journal snapshot.
#[derive(Debug, Default)]
pub struct JournalIndex {
    entries: Vec<IndexedJournal>,
}

impl JournalIndex {
    /// Build an index from a row snapshot.
    pub fn new(rows: Vec<JournalRow>) -> Self {
        Self {
            entries: rows.into_iter().map(IndexedJournal::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the indexed rows in snapshot order.
    pub fn rows(&self) -> impl Iterator<Item = &JournalRow> {
        self.entries.iter().map(IndexedJournal::row)
    }

    /// Look up a row by id.
    pub fn get(&self, id: JournalId) -> Option<&JournalRow> {
        self.rows().find(|r| r.id == id)
    }

    /// Ranked suggestions for a query.
    ///
    /// Returns at most `options.limit` rows with a positive score, best
    /// first. Equal scores keep snapshot order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<&JournalRow> {
        self.search_scored(query, options)
            .into_iter()
            .map(|(row, _)| row)
            .collect()
    }

    /// Like [`JournalIndex::search`] but keeps each row's score.
    pub fn search_scored(&self, query: &str, options: &SearchOptions) -> Vec<(&JournalRow, f64)> {
        let trimmed = query.trim();
        if trimmed.is_empty() || options.limit == 0 {
            return Vec::new();
        }
        let q = PreparedQuery::new(trimmed);

        let mut scored: Vec<(usize, f64)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| is_candidate(entry, &q))
            .filter(|(_, entry)| passes_min_if(entry.row(), options.min_if))
            .map(|(i, entry)| (i, score_prepared(entry, &q)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        trace!(query = trimmed, candidates = scored.len(), "scored search candidates");

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(options.limit);

        scored
            .into_iter()
            .map(|(i, score)| (self.entries[i].row(), score))
            .collect()
    }
}

/// Relevance score of an indexed row for a raw query.
pub fn score_row(entry: &IndexedJournal, query: &str) -> f64 {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    score_prepared(entry, &PreparedQuery::new(trimmed))
}

/// Cheap-to-expensive candidate filter.
fn is_candidate(entry: &IndexedJournal, q: &PreparedQuery) -> bool {
    if q.short_abbr_mode() {
        if entry.title.starts_with(&q.lower)
            || entry.identifiers().iter().any(|id| id.starts_with(&q.lower))
        {
            return true;
        }
        return entry.any_abbr_starts_with(&q.abbr);
    }
    if entry.haystack().contains(&q.lower) {
        return true;
    }
    q.use_abbr && entry.any_abbr_starts_with(&q.abbr)
}

fn passes_min_if(row: &JournalRow, min_if: Option<f64>) -> bool {
    match min_if {
        None => true,
        Some(threshold) => row.impact_factor().is_some_and(|v| v >= threshold),
    }
}

fn score_prepared(entry: &IndexedJournal, q: &PreparedQuery) -> f64 {
    let row = entry.row();
    let ids = entry.identifiers();
    let mut score = 0.0;

    if entry.title == q.lower {
        score += weights::TITLE_EXACT;
    }
    if ids.iter().any(|id| *id == q.lower) {
        score += weights::IDENTIFIER_EXACT;
    }
    if entry.title.starts_with(&q.lower) {
        score += weights::TITLE_PREFIX;
    }
    if ids.iter().any(|id| id.starts_with(&q.lower)) {
        score += weights::IDENTIFIER_PREFIX;
    }

    if q.use_abbr {
        let variants = entry.abbr_variants();
        if variants.contains(&q.abbr) {
            score += weights::ABBR_EXACT;
        } else if variants.iter().any(|a| a.starts_with(&q.abbr)) {
            score += weights::ABBR_PREFIX;
        }
    }

    if q.lower.chars().count() >= MIN_CONTAINS_LEN {
        if entry.title.contains(&q.lower) {
            score += weights::TITLE_CONTAINS;
        }
        if entry.haystack().contains(&q.lower) {
            score += weights::HAYSTACK_CONTAINS;
        }
    }

    if let Some(impact) = row.impact_factor() {
        score += (impact / weights::IMPACT_FACTOR_DIVISOR).min(weights::IMPACT_FACTOR_CAP);
    }
    if row.jcr_quartile.as_deref() == Some("Q1") {
        score += weights::JCR_Q1;
    }
    if row.cas_2025.as_deref().map(str::trim) == Some("1区") {
        score += weights::CAS_RANK_ONE;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nature() -> JournalRow {
        JournalRow {
            issn: Some("0028-0836".into()),
            if_2023: Some(64.8),
            jcr_quartile: Some("Q1".into()),
            cas_2025: Some("1区".into()),
            ..JournalRow::new(1, "Nature")
        }
    }

    fn sample_index() -> JournalIndex {
        JournalIndex::new(vec![
            nature(),
            JournalRow {
                issn: Some("1476-4687".into()),
                if_2023: Some(15.0),
                ..JournalRow::new(2, "Nature Communications")
            },
            JournalRow {
                if_2023: Some(2.1),
                ..JournalRow::new(3, "Signature Studies")
            },
            JournalRow {
                issn: Some("0002-7863".into()),
                if_2023: Some(14.4),
                jcr_quartile: Some("Q1".into()),
                ..JournalRow::new(4, "Journal of the American Chemical Society")
            },
            JournalRow::new(5, "Chemical Reviews"),
        ])
    }

    fn ids(rows: &[&JournalRow]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_query() {
        let index = sample_index();
        assert!(index.search("", &SearchOptions::default()).is_empty());
        assert!(index.search("   ", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn exact_title_first() {
        let index = sample_index();
        let results = index.search("NATURE", &SearchOptions::default());
        assert_eq!(ids(&results)[0], 1);
        // "Signature Studies" contains "nature" as a substring
        assert!(ids(&results).contains(&3));
        assert_eq!(ids(&results), vec![1, 2, 3]);
    }

    #[test]
    fn nature_scenario_score() {
        let entry = IndexedJournal::new(nature());
        let score = score_row(&entry, "nature");
        // 1000 exact + 450 prefix + 180 title contains + 70 haystack + 8.1 IF + 40 Q1 + 30 CAS
        assert!((score - 1778.1).abs() < 1e-9, "got {}", score);
        assert!(score >= 1150.0);
    }

    #[test]
    fn issn_exact_match() {
        let index = sample_index();
        let results = index.search("0002-7863", &SearchOptions::default());
        assert_eq!(ids(&results), vec![4]);
    }

    #[test]
    fn acronym_exact() {
        let index = sample_index();
        let results = index.search("JACS", &SearchOptions::default());
        assert_eq!(ids(&results), vec![4]);
        let entry = IndexedJournal::new(index.get(4).unwrap().clone());
        // 280 abbreviation + 1.8 IF + 40 Q1; "jacs" is not a title substring
        let score = score_row(&entry, "jacs");
        assert!((score - 321.8).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn acronym_prefix_only_once() {
        let entry = IndexedJournal::new(JournalRow::new(9, "Journal of the American Chemical Society"));
        // "jac" is a prefix of "jacs" but equals no variant
        assert_eq!(score_row(&entry, "jac"), weights::ABBR_PREFIX);
    }

    #[test]
    fn short_abbr_mode_requires_prefix() {
        let index = sample_index();
        // "ture" is a substring of "nature" but neither a prefix nor an acronym
        assert!(index.search("ture", &SearchOptions::default()).is_empty());
        // Five characters leaves short mode, so substring matching applies
        let results = index.search("ature", &SearchOptions::default());
        assert_eq!(ids(&results), vec![1, 2, 3]);
    }

    #[test]
    fn min_if_filter() {
        let index = sample_index();
        let options = SearchOptions {
            min_if: Some(5.0),
            ..Default::default()
        };
        let results = index.search("nature", &options);
        assert_eq!(ids(&results), vec![1, 2]);
        for row in results {
            assert!(row.impact_factor().unwrap() >= 5.0);
        }
    }

    #[test]
    fn min_if_drops_rows_without_finite_impact_factor() {
        let index = JournalIndex::new(vec![
            JournalRow::new(1, "Nature Plants"),
            JournalRow {
                if_2023: Some(9.0),
                ..JournalRow::new(2, "Nature Energy")
            },
            JournalRow {
                if_2023: Some(f64::NAN),
                ..JournalRow::new(3, "Nature Foods")
            },
        ]);
        assert_eq!(ids(&index.search("nature", &SearchOptions::default())), vec![2, 1, 3]);

        let options = SearchOptions {
            min_if: Some(5.0),
            ..Default::default()
        };
        assert_eq!(ids(&index.search("nature", &options)), vec![2]);

        let options = SearchOptions {
            min_if: Some(0.0),
            ..Default::default()
        };
        assert_eq!(ids(&index.search("nature", &options)), vec![2]);
    }

    #[test]
    fn limit_results() {
        let index = sample_index();
        let options = SearchOptions {
            limit: 2,
            ..Default::default()
        };
        assert_eq!(index.search("nature", &options).len(), 2);
    }

    #[test]
    fn deterministic() {
        let index = sample_index();
        let a = ids(&index.search("chem", &SearchOptions::default()));
        let b = ids(&index.search("chem", &SearchOptions::default()));
        assert_eq!(a, b);
    }

    #[test]
    fn ties_keep_snapshot_order() {
        let index = JournalIndex::new(vec![
            JournalRow::new(10, "Alpha Letters"),
            JournalRow::new(11, "Alpha Letters"),
            JournalRow::new(12, "Alpha Letters"),
        ]);
        let results = index.search("alpha", &SearchOptions::default());
        assert_eq!(ids(&results), vec![10, 11, 12]);
    }

    #[test]
    fn memoized_fields_are_stable() {
        let entry = IndexedJournal::new(nature());
        let first = entry.haystack().to_string();
        assert_eq!(entry.haystack(), first);
        assert_eq!(entry.haystack(), haystack(entry.row()));
        assert_eq!(entry.abbr_variants(), &title_abbr_variants("Nature"));
    }
}
