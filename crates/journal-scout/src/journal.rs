//! Journal row types.
//!
//! Rows come from a generated JSON catalog whose fields are frequently
//! missing, `null`, or of an unexpected scalar type. Deserialization is
//! lenient: scalars are coerced to strings, malformed numbers and lists
//! become "absent", and a row never fails to load because one field is odd.

use serde::{Deserialize, Serialize};

use crate::normalize::year_num;

/// Stable journal identifier (also the URL `id` parameter).
pub type JournalId = i64;

/// One cataloged journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalRow {
    #[serde(default, deserialize_with = "loose::id")]
    pub id: JournalId,
    #[serde(default, deserialize_with = "loose::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub issn: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub eissn: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub cn_number: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub official_url: Option<String>,

    // Bibliometrics
    #[serde(default, deserialize_with = "loose::number")]
    pub if_2023: Option<f64>,
    #[serde(default, deserialize_with = "loose::string")]
    pub if_year: Option<String>,
    #[serde(default, deserialize_with = "loose::list")]
    pub if_history: Vec<IfRecord>,

    // Classification
    #[serde(default, deserialize_with = "loose::string")]
    pub jcr_quartile: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub cas_2025: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub is_top: Option<bool>,
    #[serde(default, deserialize_with = "loose::list")]
    pub cas_history: Vec<CasRecord>,
    #[serde(default, deserialize_with = "loose::string")]
    pub hq_level: Option<String>,
    #[serde(default, deserialize_with = "loose::list")]
    pub hq_records: Vec<HqRecord>,
    #[serde(default, deserialize_with = "loose::string_list")]
    pub hq_fields: Vec<String>,
    #[serde(default, deserialize_with = "loose::string_list")]
    pub hq_societies: Vec<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub pku_core: Option<bool>,
    #[serde(default, deserialize_with = "loose::string")]
    pub cssci_type: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub cscd_type: Option<String>,
    #[serde(default, deserialize_with = "loose::string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub warning_latest: Option<String>,
}

/// One year of impact-factor history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IfRecord {
    #[serde(default, deserialize_with = "loose::string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "loose::number")]
    pub if_value: Option<f64>,
    #[serde(default, deserialize_with = "loose::string")]
    pub quartile: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub rank: Option<String>,
}

/// One year of CAS (Chinese Academy of Sciences) ranking history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CasRecord {
    #[serde(default, deserialize_with = "loose::string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub rank: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub top: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "loose::list")]
    pub subcategories: Vec<CasSubcategory>,
    #[serde(default, deserialize_with = "loose::string")]
    pub wos: Option<String>,
}

/// A CAS minor subject category with its rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CasSubcategory {
    #[serde(default, deserialize_with = "loose::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub rank: Option<String>,
}

/// An entry in a society "high-quality journal" directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HqRecord {
    #[serde(default, deserialize_with = "loose::string")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub society: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    pub subfield: Option<String>,
}

impl JournalRow {
    /// Create a bare row with an id and title.
    pub fn new(id: JournalId, title: &str) -> Self {
        Self {
            id,
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    /// Title as a string, empty when absent.
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn issn_str(&self) -> &str {
        self.issn.as_deref().unwrap_or("")
    }

    pub fn eissn_str(&self) -> &str {
        self.eissn.as_deref().unwrap_or("")
    }

    pub fn cn_number_str(&self) -> &str {
        self.cn_number.as_deref().unwrap_or("")
    }

    /// Impact factor if it is a finite number.
    pub fn impact_factor(&self) -> Option<f64> {
        self.if_2023.filter(|v| v.is_finite())
    }

    /// Whether the row is flagged as CAS top-tier.
    pub fn is_top(&self) -> bool {
        self.is_top == Some(true)
    }

    /// Whether the row carries a (non-empty) CAS warning.
    pub fn has_warning(&self) -> bool {
        self.warning_latest.as_deref().is_some_and(|w| !w.is_empty())
    }

    /// The most recent CAS history entry by year.
    ///
    /// Years compare by their digits only; on equal years the earliest entry wins.
    pub fn latest_cas_record(&self) -> Option<&CasRecord> {
        let mut iter = self.cas_history.iter();
        let mut latest = iter.next()?;
        let mut latest_year = year_num(latest.year.as_deref().unwrap_or(""));
        for record in iter {
            let year = year_num(record.year.as_deref().unwrap_or(""));
            if year > latest_year {
                latest = record;
                latest_year = year;
            }
        }
        Some(latest)
    }
}

/// Non-empty trimmed value of an optional string field.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Lenient field deserializers.
pub(crate) mod loose {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::JournalId;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_to_string(Value::deserialize(d)?))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let parsed = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(parsed.filter(|v| v.is_finite()))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => Some(b),
            _ => None,
        })
    }

    /// Non-negative whole number; anything else counts as 0.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(number(d)?
            .filter(|v| *v >= 0.0)
            .map(|v| v.trunc() as u64)
            .unwrap_or(0))
    }

    /// Truthy flag: only a real `true` is set.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(boolean(d)?.unwrap_or(false))
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<JournalId, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        })
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        })
    }

    /// A list whose malformed elements are skipped.
    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
