//! Classification badges for a journal row.
//!
//! Badges are produced by a fixed-priority rule table. Each rule reads the
//! row's structured fields first and falls back to literal markers in the
//! free-form `tags` list. Display text is de-duplicated on a first-wins basis,
//! so a later rule can never displace an earlier badge.

use serde::{Deserialize, Serialize};

use crate::journal::{non_empty, JournalRow};

/// Display labels.
pub mod labels {
    pub const CAS_PREFIX: &str = "中科院";
    pub const TOP_SUFFIX: &str = " (Top)";
    pub const HQ_PREFIX: &str = "科协-";
    pub const PKU: &str = "北大核心";
    pub const CSSCI: &str = "CSSCI";
    pub const CSSCI_EXTENDED: &str = "CSSCI(扩展)";
    pub const CSSCI_SOURCE_TYPE: &str = "来源版";
    pub const CSSCI_EXTENDED_TYPE: &str = "扩展版";
    pub const CSCD_PREFIX: &str = "CSCD-";
    pub const CSCD_CORE: &str = "核心库";
    pub const CSCD_EXTENDED: &str = "扩展库";
    pub const WARNING: &str = "中科院预警";
    pub const EMPTY: &str = "无核心标签";
}

/// Visual category of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Jcr,
    Cas,
    Hq,
    Pku,
    Cssci,
    Cscd,
    Wos,
    Ei,
    Warn,
    Empty,
}

impl BadgeStyle {
    /// CSS class used by the web front end.
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeStyle::Jcr => "tag--jcr",
            BadgeStyle::Cas => "tag--cas",
            BadgeStyle::Hq => "tag--hq",
            BadgeStyle::Pku => "tag--pku",
            BadgeStyle::Cssci => "tag--cssci",
            BadgeStyle::Cscd => "tag--cscd",
            BadgeStyle::Wos => "tag--wos",
            BadgeStyle::Ei => "tag--ei",
            BadgeStyle::Warn => "tag--warn",
            BadgeStyle::Empty => "tag--empty",
        }
    }
}

/// A classification badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub style: BadgeStyle,
}

impl Badge {
    pub fn new(text: impl Into<String>, style: BadgeStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// The "no core tags" sentinel.
    pub fn empty() -> Self {
        Self::new(labels::EMPTY, BadgeStyle::Empty)
    }

    pub fn is_empty_sentinel(&self) -> bool {
        self.style == BadgeStyle::Empty
    }
}

/// Trimmed, non-empty `tags` entries of a row.
pub struct RowTags<'a>(Vec<&'a str>);

impl<'a> RowTags<'a> {
    pub fn of(row: &'a JournalRow) -> Self {
        Self(
            row.tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.0.iter().any(|t| *t == literal)
    }

    pub fn contains_any(&self, literals: &[&str]) -> bool {
        literals.iter().any(|l| self.contains(l))
    }

    pub fn iter(&self) -> impl Iterator<Item = &&'a str> {
        self.0.iter()
    }
}

/// A classification rule: inspects a row and proposes zero or more badges.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&JournalRow, &RowTags<'_>) -> Vec<Badge>,
}

/// All rules in display priority order.
pub const RULES: &[Rule] = &[
    Rule { name: "jcr", apply: jcr_rule },
    Rule { name: "cas", apply: cas_rule },
    Rule { name: "hq", apply: hq_rule },
    Rule { name: "pku", apply: pku_rule },
    Rule { name: "cssci", apply: cssci_rule },
    Rule { name: "cscd", apply: cscd_rule },
    Rule { name: "wos", apply: wos_rule },
    Rule { name: "ei", apply: ei_rule },
    Rule { name: "warning", apply: warning_rule },
];

/// Tag literals implying a CSSCI type, checked in order.
pub const CSSCI_TAG_TYPES: &[(&[&str], &str)] = &[
    (&["CSSCI(扩展)", "CSSCI扩展"], labels::CSSCI_EXTENDED_TYPE),
    (&["CSSCI"], labels::CSSCI_SOURCE_TYPE),
];

/// Tag literals implying a CSCD type, checked in order (after a `CSCD-` prefixed tag).
pub const CSCD_TAG_TYPES: &[(&[&str], &str)] = &[
    (&["CSCD(核心)", "CSCD核心"], labels::CSCD_CORE),
    (&["CSCD(扩展)", "CSCD扩展"], labels::CSCD_EXTENDED),
    (&["CSCD"], labels::CSCD_CORE),
];

/// Web of Science indexes, in emission order.
pub const WOS_INDEXES: &[&str] = &["SCI", "SCIE", "SSCI", "ESCI", "AHCI"];

/// Classify a row into ordered, de-duplicated badges.
///
/// Never returns an empty list: a row without any signal yields the
/// single "no core tags" sentinel.
pub fn classify(row: &JournalRow) -> Vec<Badge> {
    let tags = RowTags::of(row);
    let mut badges: Vec<Badge> = Vec::new();

    for rule in RULES {
        for badge in (rule.apply)(row, &tags) {
            push_badge(&mut badges, badge);
        }
    }

    if badges.is_empty() {
        badges.push(Badge::empty());
    }
    badges
}

/// Append a badge unless its trimmed text is empty or already present.
fn push_badge(badges: &mut Vec<Badge>, badge: Badge) {
    let text = badge.text.trim();
    if text.is_empty() || badges.iter().any(|b| b.text == text) {
        return;
    }
    badges.push(Badge::new(text, badge.style));
}

fn jcr_rule(row: &JournalRow, _: &RowTags<'_>) -> Vec<Badge> {
    non_empty(&row.jcr_quartile)
        .map(|q| Badge::new(format!("JCR {}", q), BadgeStyle::Jcr))
        .into_iter()
        .collect()
}

fn cas_rule(row: &JournalRow, _: &RowTags<'_>) -> Vec<Badge> {
    non_empty(&row.cas_2025)
        .map(|rank| {
            let suffix = if row.is_top() { labels::TOP_SUFFIX } else { "" };
            Badge::new(
                format!("{}{}{}", labels::CAS_PREFIX, rank, suffix),
                BadgeStyle::Cas,
            )
        })
        .into_iter()
        .collect()
}

/// HQ tier from `hq_level`, else from an `HQ-<level>` tag (uppercased).
pub fn resolve_hq_level(row: &JournalRow, tags: &RowTags<'_>) -> Option<String> {
    if let Some(level) = non_empty(&row.hq_level) {
        return Some(level.to_string());
    }
    tags.iter().find_map(|tag| {
        let prefix = tag.get(..3)?;
        if !prefix.eq_ignore_ascii_case("hq-") {
            return None;
        }
        let level = tag.get(3..)?.trim();
        (!level.is_empty()).then(|| level.to_uppercase())
    })
}

fn hq_rule(row: &JournalRow, tags: &RowTags<'_>) -> Vec<Badge> {
    resolve_hq_level(row, tags)
        .map(|level| Badge::new(format!("{}{}", labels::HQ_PREFIX, level), BadgeStyle::Hq))
        .into_iter()
        .collect()
}

fn pku_rule(row: &JournalRow, tags: &RowTags<'_>) -> Vec<Badge> {
    if row.pku_core == Some(true) || tags.contains(labels::PKU) {
        vec![Badge::new(labels::PKU, BadgeStyle::Pku)]
    } else {
        Vec::new()
    }
}

/// CSSCI type from `cssci_type`, else inferred from tag literals.
pub fn resolve_cssci_type(row: &JournalRow, tags: &RowTags<'_>) -> Option<String> {
    if let Some(t) = non_empty(&row.cssci_type) {
        return Some(t.to_string());
    }
    CSSCI_TAG_TYPES
        .iter()
        .find(|(literals, _)| tags.contains_any(literals))
        .map(|(_, kind)| kind.to_string())
}

fn cssci_rule(row: &JournalRow, tags: &RowTags<'_>) -> Vec<Badge> {
    resolve_cssci_type(row, tags)
        .map(|kind| {
            let text = if kind == labels::CSSCI_EXTENDED_TYPE {
                labels::CSSCI_EXTENDED
            } else {
                labels::CSSCI
            };
            Badge::new(text, BadgeStyle::Cssci)
        })
        .into_iter()
        .collect()
}

/// CSCD type from `cscd_type`, else a `CSCD-<type>` tag, else known literals.
pub fn resolve_cscd_type(row: &JournalRow, tags: &RowTags<'_>) -> Option<String> {
    if let Some(t) = non_empty(&row.cscd_type) {
        return Some(t.to_string());
    }
    if let Some(rest) = tags.iter().find_map(|t| t.strip_prefix(labels::CSCD_PREFIX)) {
        return Some(rest.trim().to_string());
    }
    CSCD_TAG_TYPES
        .iter()
        .find(|(literals, _)| tags.contains_any(literals))
        .map(|(_, kind)| kind.to_string())
}

fn cscd_rule(row: &JournalRow, tags: &RowTags<'_>) -> Vec<Badge> {
    resolve_cscd_type(row, tags)
        .filter(|kind| !kind.is_empty())
        .map(|kind| Badge::new(format!("{}{}", labels::CSCD_PREFIX, kind), BadgeStyle::Cscd))
        .into_iter()
        .collect()
}

/// Web of Science indexes mentioned anywhere in the tags.
///
/// An index matches when it appears as a whole token (tags split on runs of
/// non-letters) or, for the four-letter names, as a substring.
pub fn collect_wos_indexes(tags: &RowTags<'_>) -> Vec<&'static str> {
    let mut found = [false; 5];
    for tag in tags.iter() {
        let upper = tag.to_uppercase();
        let tokens: Vec<&str> = upper
            .split(|c: char| !c.is_ascii_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        for (i, index) in WOS_INDEXES.iter().enumerate() {
            let substring_match = index.len() > 3 && upper.contains(index);
            if tokens.contains(index) || substring_match {
                found[i] = true;
            }
        }
    }
    WOS_INDEXES
        .iter()
        .zip(found)
        .filter_map(|(index, hit)| hit.then_some(*index))
        .collect()
}

fn wos_rule(_: &JournalRow, tags: &RowTags<'_>) -> Vec<Badge> {
    collect_wos_indexes(tags)
        .into_iter()
        .map(|index| Badge::new(index, BadgeStyle::Wos))
        .collect()
}

fn ei_rule(_: &JournalRow, tags: &RowTags<'_>) -> Vec<Badge> {
    if tags.iter().any(|t| t.to_uppercase() == "EI") {
        vec![Badge::new("EI", BadgeStyle::Ei)]
    } else {
        Vec::new()
    }
}

fn warning_rule(row: &JournalRow, _: &RowTags<'_>) -> Vec<Badge> {
    if row.has_warning() {
        vec![Badge::new(labels::WARNING, BadgeStyle::Warn)]
    } else {
        Vec::new()
    }
}
