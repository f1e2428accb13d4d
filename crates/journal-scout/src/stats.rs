//! HQ field statistics.
//!
//! One [`FieldStat`] per high-quality catalog field, comparing the journal
//! count the catalog declares with what was actually parsed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::journal::loose;

/// Parse statistics for one HQ field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStat {
    #[serde(default, deserialize_with = "loose::count")]
    pub index: u64,
    #[serde(default, deserialize_with = "loose::string")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub society: Option<String>,
    #[serde(default, deserialize_with = "loose::count")]
    pub declared_count: u64,
    #[serde(default, deserialize_with = "loose::count")]
    pub parsed_count: u64,
    #[serde(default, deserialize_with = "loose::count")]
    pub parsed_unique_count: u64,
    #[serde(default, deserialize_with = "loose::flag")]
    pub match_declared: bool,
    #[serde(default, deserialize_with = "loose::flag")]
    pub match_by_parsed_count: bool,
    #[serde(default, deserialize_with = "loose::flag")]
    pub match_by_unique_count: bool,
}

/// Whether a field's parsed count agrees with the declared count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldStatus {
    Matched,
    MatchedAfterDedup,
    Mismatched,
}

impl FieldStatus {
    pub fn of(stat: &FieldStat) -> Self {
        if !stat.match_declared {
            return FieldStatus::Mismatched;
        }
        if stat.match_by_parsed_count {
            FieldStatus::Matched
        } else if stat.match_by_unique_count {
            FieldStatus::MatchedAfterDedup
        } else {
            FieldStatus::Matched
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldStatus::Matched => "一致",
            FieldStatus::MatchedAfterDedup => "去重后一致",
            FieldStatus::Mismatched => "不一致",
        }
    }
}

impl std::fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FieldStat {
    pub fn status(&self) -> FieldStatus {
        FieldStatus::of(self)
    }
}

/// Parse a stats file (a JSON array of field rows).
///
/// A payload that is not an array yields no rows; non-object entries are skipped.
pub fn parse_field_stats(text: &str) -> Result<Vec<FieldStat>> {
    let rows = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(rows)
}

/// Rows ordered by their catalog index.
pub fn sorted_by_index(rows: &[FieldStat]) -> Vec<&FieldStat> {
    let mut sorted: Vec<&FieldStat> = rows.iter().collect();
    sorted.sort_by_key(|r| r.index);
    sorted
}

/// Totals across all fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub declared_sum: u64,
    pub parsed_sum: u64,
    pub unique_sum: u64,
}

impl StatsSummary {
    pub fn from_rows(rows: &[FieldStat]) -> Self {
        let matched = rows.iter().filter(|r| r.match_declared).count();
        Self {
            total: rows.len(),
            matched,
            unmatched: rows.len() - matched,
            declared_sum: rows.iter().map(|r| r.declared_count).sum(),
            parsed_sum: rows.iter().map(|r| r.parsed_count).sum(),
            unique_sum: rows.iter().map(|r| r.parsed_unique_count).sum(),
        }
    }
}
