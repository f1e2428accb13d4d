//! Related-journal suggestions for a pivot row.
//!
//! Similarity is driven mostly by the CAS subject profile of each journal's
//! latest CAS ranking (minor categories first, then the major category),
//! with smaller bonuses for matching rank labels and similar impact factors.
//!
//! Ranking: CAS priority > shared subcategories > major match > score >
//! closer impact factor > higher impact factor.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::journal::{non_empty, JournalRow};
use crate::normalize::normalize_cas_key;

/// Default number of related journals returned.
pub const DEFAULT_RELATED_LIMIT: usize = 24;

/// Similarity weights.
pub mod weights {
    pub const SUBCATEGORY_BASE: f64 = 240.0;
    pub const SUBCATEGORY_PER_MATCH: f64 = 36.0;
    pub const SUBCATEGORY_MATCH_CAP: usize = 3;
    pub const MAJOR_CATEGORY: f64 = 150.0;
    pub const SAME_CAS_RANK: f64 = 56.0;
    pub const SAME_JCR_QUARTILE: f64 = 34.0;
    pub const SAME_HQ_LEVEL: f64 = 10.0;
    pub const BOTH_TOP: f64 = 8.0;
    pub const IF_PROXIMITY_MAX: f64 = 18.0;
    pub const IF_PROXIMITY_SLOPE: f64 = 1.8;
}

/// Subcategory names shown in a reason string.
const REASON_SUBCATEGORY_NAMES: usize = 2;

/// Subject profile taken from a row's most recent CAS record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CasProfile {
    /// Major category as displayed
    pub major_raw: String,
    /// Normalized major category key (empty when absent)
    pub major_key: String,
    /// Normalized subcategory keys in first-seen order
    pub sub_keys: Vec<String>,
    /// Display name for each subcategory key
    pub sub_names: HashMap<String, String>,
}

impl CasProfile {
    /// Build the profile of a row.
    pub fn of(row: &JournalRow) -> Self {
        let Some(latest) = row.latest_cas_record() else {
            return Self::default();
        };

        let major_raw = latest.category.as_deref().unwrap_or("").trim().to_string();
        let major_key = normalize_cas_key(&major_raw);

        let mut sub_keys = Vec::new();
        let mut sub_names = HashMap::new();
        for sub in &latest.subcategories {
            let Some(name) = non_empty(&sub.name) else {
                continue;
            };
            let key = normalize_cas_key(name);
            if key.is_empty() || sub_names.contains_key(&key) {
                continue;
            }
            sub_names.insert(key.clone(), name.to_string());
            sub_keys.push(key);
        }

        Self {
            major_raw,
            major_key,
            sub_keys,
            sub_names,
        }
    }

    fn has_sub(&self, key: &str) -> bool {
        self.sub_names.contains_key(key)
    }
}

/// Pairwise similarity between a pivot and a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Similarity {
    pub score: f64,
    pub reasons: Vec<String>,
    /// Absolute impact-factor difference; infinite when either side lacks one
    pub if_diff: f64,
    pub major_match: bool,
    pub sub_match_count: usize,
}

impl Similarity {
    /// 3 = subcategory and major match, 2 = subcategory only, 1 = major only, 0 = neither.
    pub fn cas_priority(&self) -> u8 {
        match (self.sub_match_count > 0, self.major_match) {
            (true, true) => 3,
            (true, false) => 2,
            (false, true) => 1,
            (false, false) => 0,
        }
    }
}

/// A related journal with the evidence for the suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedJournal<'a> {
    pub journal: &'a JournalRow,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Both sides carry the same non-empty literal.
fn same_literal(a: &Option<String>, b: &Option<String>) -> bool {
    match (a.as_deref(), b.as_deref()) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

/// Compute the similarity of `candidate` to `pivot` given both CAS profiles.
pub fn compute_similarity(
    pivot: &JournalRow,
    candidate: &JournalRow,
    pivot_profile: &CasProfile,
    candidate_profile: &CasProfile,
) -> Similarity {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let major_match = !pivot_profile.major_key.is_empty()
        && pivot_profile.major_key == candidate_profile.major_key;

    let matched_names: Vec<&str> = pivot_profile
        .sub_keys
        .iter()
        .filter(|key| candidate_profile.has_sub(key))
        .map(|key| {
            pivot_profile
                .sub_names
                .get(key)
                .or_else(|| candidate_profile.sub_names.get(key))
                .map(String::as_str)
                .unwrap_or(key.as_str())
        })
        .collect();
    let sub_match_count = matched_names.len();

    if sub_match_count > 0 {
        let capped = sub_match_count.min(weights::SUBCATEGORY_MATCH_CAP) as f64;
        score += weights::SUBCATEGORY_BASE + capped * weights::SUBCATEGORY_PER_MATCH;
        let label = matched_names[..sub_match_count.min(REASON_SUBCATEGORY_NAMES)].join(" / ");
        reasons.push(format!("同中科院小类（{}）", label));
    }
    if major_match {
        score += weights::MAJOR_CATEGORY;
        reasons.push("同中科院大类".to_string());
    }
    if same_literal(&pivot.cas_2025, &candidate.cas_2025) {
        score += weights::SAME_CAS_RANK;
        reasons.push("同中科院分区".to_string());
    }
    if same_literal(&pivot.jcr_quartile, &candidate.jcr_quartile) {
        score += weights::SAME_JCR_QUARTILE;
        reasons.push("同JCR分区".to_string());
    }
    if same_literal(&pivot.hq_level, &candidate.hq_level) {
        score += weights::SAME_HQ_LEVEL;
        reasons.push("同科协等级".to_string());
    }
    if pivot.is_top() && candidate.is_top() {
        score += weights::BOTH_TOP;
        reasons.push("均为Top".to_string());
    }

    let mut if_diff = f64::INFINITY;
    if let (Some(a), Some(b)) = (pivot.impact_factor(), candidate.impact_factor()) {
        if_diff = (a - b).abs();
        score += (weights::IF_PROXIMITY_MAX - if_diff * weights::IF_PROXIMITY_SLOPE).max(0.0);
    }

    Similarity {
        score,
        reasons,
        if_diff,
        major_match,
        sub_match_count,
    }
}

/// Total order used to rank candidates (best first).
fn compare_candidates(
    a: &(&JournalRow, Similarity),
    b: &(&JournalRow, Similarity),
) -> Ordering {
    let (a_row, a_sim) = a;
    let (b_row, b_sim) = b;
    let own_if = |row: &JournalRow| row.impact_factor().unwrap_or(-1.0);

    b_sim
        .cas_priority()
        .cmp(&a_sim.cas_priority())
        .then_with(|| b_sim.sub_match_count.cmp(&a_sim.sub_match_count))
        .then_with(|| b_sim.major_match.cmp(&a_sim.major_match))
        .then_with(|| b_sim.score.partial_cmp(&a_sim.score).unwrap_or(Ordering::Equal))
        .then_with(|| a_sim.if_diff.partial_cmp(&b_sim.if_diff).unwrap_or(Ordering::Equal))
        .then_with(|| {
            own_if(*b_row)
                .partial_cmp(&own_if(*a_row))
                .unwrap_or(Ordering::Equal)
        })
}

/// Up to `limit` rows most similar to `pivot`, excluding the pivot itself.
///
/// Candidates with no positive similarity are dropped. Full ties keep the
/// order of `rows`.
pub fn find_related<'a, I>(pivot: &JournalRow, rows: I, limit: usize) -> Vec<RelatedJournal<'a>>
where
    I: IntoIterator<Item = &'a JournalRow>,
{
    let pivot_profile = CasProfile::of(pivot);

    let mut candidates: Vec<(&JournalRow, Similarity)> = rows
        .into_iter()
        .filter(|row| row.id != pivot.id)
        .map(|row| {
            let profile = CasProfile::of(row);
            (row, compute_similarity(pivot, row, &pivot_profile, &profile))
        })
        .filter(|(_, sim)| sim.score > 0.0)
        .collect();

    candidates.sort_by(compare_candidates);
    candidates.truncate(limit);

    candidates
        .into_iter()
        .map(|(journal, sim)| RelatedJournal {
            journal,
            score: sim.score,
            reasons: sim.reasons,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{CasRecord, CasSubcategory};

    fn cas(year: &str, major: &str, subs: &[&str]) -> CasRecord {
        CasRecord {
            year: Some(year.into()),
            category: Some(major.into()),
            subcategories: subs
                .iter()
                .map(|s| CasSubcategory {
                    name: Some(s.to_string()),
                    rank: Some("2区".into()),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn journal(id: i64, major: &str, subs: &[&str]) -> JournalRow {
        JournalRow {
            cas_history: vec![cas("2023", major, subs)],
            ..JournalRow::new(id, &format!("Journal {}", id))
        }
    }

    fn ids(related: &[RelatedJournal<'_>]) -> Vec<i64> {
        related.iter().map(|r| r.journal.id).collect()
    }

    #[test]
    fn profile_uses_latest_record() {
        let row = JournalRow {
            cas_history: vec![
                cas("2021", "物理", &["光学"]),
                cas("2023", "化学", &["Chemistry, Physical", "chemistry physical", ""]),
            ],
            ..JournalRow::new(1, "X")
        };
        let profile = CasProfile::of(&row);
        assert_eq!(profile.major_raw, "化学");
        assert_eq!(profile.sub_keys, vec!["chemistryphysical"]);
        assert_eq!(profile.sub_names["chemistryphysical"], "Chemistry, Physical");
    }

    #[test]
    fn excludes_pivot() {
        let pivot = journal(1, "化学", &["有机化学"]);
        let rows = vec![pivot.clone(), journal(2, "化学", &["有机化学"])];
        let related = find_related(&pivot, &rows, DEFAULT_RELATED_LIMIT);
        assert_eq!(ids(&related), vec![2]);
    }

    #[test]
    fn zero_score_dropped() {
        let pivot = journal(1, "化学", &["有机化学"]);
        let rows = vec![journal(2, "医学", &["肿瘤学"])];
        assert!(find_related(&pivot, &rows, DEFAULT_RELATED_LIMIT).is_empty());
    }

    #[test]
    fn subcategory_beats_major_regardless_of_score() {
        let pivot = JournalRow {
            cas_2025: Some("1区".into()),
            jcr_quartile: Some("Q1".into()),
            is_top: Some(true),
            if_2023: Some(10.0),
            ..journal(1, "化学", &["有机化学"])
        };
        // A: shares a subcategory under a different major category
        let a = journal(2, "工程技术", &["有机化学"]);
        // B: major match plus the rank, quartile, top and IF bonuses
        let b = JournalRow {
            cas_2025: Some("1区".into()),
            jcr_quartile: Some("Q1".into()),
            is_top: Some(true),
            if_2023: Some(10.0),
            ..journal(3, "化学", &["无机化学"])
        };
        let rows = vec![b, a];
        let related = find_related(&pivot, &rows, DEFAULT_RELATED_LIMIT);
        assert_eq!(ids(&related), vec![2, 3]);
        assert_eq!(related[0].reasons, vec!["同中科院小类（有机化学）"]);
        assert_eq!(related[1].reasons[0], "同中科院大类");
    }

    #[test]
    fn similarity_components() {
        let pivot = JournalRow {
            hq_level: Some("T1".into()),
            if_2023: Some(5.0),
            ..journal(1, "化学", &["有机化学", "分析化学", "无机化学", "电化学"])
        };
        let cand = JournalRow {
            hq_level: Some("T1".into()),
            if_2023: Some(4.0),
            ..journal(2, "化学", &["电化学", "有机化学", "分析化学", "无机化学"])
        };
        let sim = compute_similarity(&pivot, &cand, &CasProfile::of(&pivot), &CasProfile::of(&cand));
        assert_eq!(sim.sub_match_count, 4);
        assert!(sim.major_match);
        assert_eq!(sim.cas_priority(), 3);
        // 240 + 3*36 + 150 + 10 + (18 - 1.8)
        assert!((sim.score - 524.2).abs() < 1e-9, "got {}", sim.score);
        assert_eq!(sim.reasons[0], "同中科院小类（有机化学 / 分析化学）");
        assert_eq!(sim.reasons[1], "同中科院大类");
        assert_eq!(sim.reasons[2], "同科协等级");
    }

    #[test]
    fn if_proximity_only_when_both_present() {
        let pivot = JournalRow {
            if_2023: Some(3.0),
            ..JournalRow::new(1, "A")
        };
        let without = JournalRow::new(2, "B");
        let sim = compute_similarity(&pivot, &without, &CasProfile::default(), &CasProfile::default());
        assert_eq!(sim.score, 0.0);
        assert!(sim.if_diff.is_infinite());

        let near = JournalRow {
            if_2023: Some(3.5),
            ..JournalRow::new(3, "C")
        };
        let sim = compute_similarity(&pivot, &near, &CasProfile::default(), &CasProfile::default());
        assert!((sim.score - 17.1).abs() < 1e-9);
    }

    #[test]
    fn tie_breaks_on_if_difference_then_own_if() {
        let pivot = JournalRow {
            if_2023: Some(5.0),
            ..journal(1, "化学", &[])
        };
        let far = JournalRow {
            if_2023: Some(8.0),
            ..journal(2, "化学", &[])
        };
        let near_low = JournalRow {
            if_2023: Some(4.0),
            ..journal(3, "化学", &[])
        };
        let near_high = JournalRow {
            if_2023: Some(6.0),
            ..journal(4, "化学", &[])
        };
        let rows = vec![far, near_low, near_high];
        let related = find_related(&pivot, &rows, DEFAULT_RELATED_LIMIT);
        // near_low and near_high tie on score and IF difference; higher own IF wins
        assert_eq!(ids(&related), vec![4, 3, 2]);
    }

    #[test]
    fn zero_impact_factor_ranks_above_missing() {
        let pivot = journal(1, "化学", &[]);
        let rows = vec![
            pivot.clone(),
            journal(2, "化学", &[]),
            JournalRow {
                if_2023: Some(0.0),
                ..journal(3, "化学", &[])
            },
        ];
        let related = find_related(&pivot, &rows, 10);
        assert_eq!(ids(&related), vec![3, 2]);
        assert_eq!(related[0].score, related[1].score);
    }

    #[test]
    fn respects_limit() {
        let pivot = journal(1, "化学", &["有机化学"]);
        let rows: Vec<JournalRow> = (2..40).map(|id| journal(id, "化学", &["有机化学"])).collect();
        let related = find_related(&pivot, &rows, DEFAULT_RELATED_LIMIT);
        assert_eq!(related.len(), 24);
        // Full ties keep input order
        assert_eq!(related[0].journal.id, 2);
    }
}
