//! Text normalization for search and matching.
//!
//! - Haystack construction (title + ISSN + eISSN + CN number)
//! - Acronym query detection
//! - Title abbreviation variants ("Journal of the American Chemical Society" → "jacs")
//! - CAS subject-category keys and small year/rank parsers

use std::collections::BTreeSet;

use crate::journal::JournalRow;

/// Words skipped when building "core" title initials.
pub const ABBR_STOPWORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "from", "in", "of", "on", "or", "the", "to", "with",
];

/// Lowercased `title issn eissn cn_number`, single-space joined.
pub fn haystack(row: &JournalRow) -> String {
    [
        row.title_str(),
        row.issn_str(),
        row.eissn_str(),
        row.cn_number_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Lowercase and drop everything outside `[a-z0-9]`.
///
/// # Examples
/// ```
/// use journal_scout::normalize_abbr_query;
/// assert_eq!(normalize_abbr_query("J. Am. Chem. Soc."), "jamchemsoc");
/// assert_eq!(normalize_abbr_query("中文"), "");
/// ```
pub fn normalize_abbr_query(query: &str) -> String {
    query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Whether an already-normalized query looks like an acronym (2-10 chars of `[a-z0-9]`).
pub fn is_abbr_query(normalized: &str) -> bool {
    (2..=10).contains(&normalized.len())
        && normalized
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Candidate acronyms for a title.
///
/// Up to three variants: initials of every word, initials of the
/// non-stopword ("core") words, and the first two core initials.
pub fn title_abbr_variants(title: &str) -> BTreeSet<String> {
    let words: Vec<&str> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut variants = BTreeSet::new();
    if words.is_empty() {
        return variants;
    }

    let all_initials = initials(&words);
    if all_initials.len() >= 2 {
        variants.insert(all_initials);
    }

    let core_words: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !ABBR_STOPWORDS.contains(&w.to_ascii_lowercase().as_str()))
        .collect();
    let core_initials = initials(&core_words);
    if core_initials.len() >= 2 {
        variants.insert(core_initials);
    }

    if core_words.len() >= 2 {
        variants.insert(initials(&core_words[..2]));
    }

    variants
}

fn initials(words: &[&str]) -> String {
    words
        .iter()
        .filter_map(|w| w.chars().next())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Comparison key for CAS category names: lowercase, letters and digits only.
///
/// CJK ideographs count as letters, so Chinese category names survive intact.
pub fn normalize_cas_key(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Numeric year from a loose token like `"2023"` or `"2023年"`; 0 when none.
pub fn year_num(raw: &str) -> u32 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Academic-year label for an impact factor year, e.g. `2023` → `"2023-2024年度"`.
pub fn format_if_academic_year(raw_year: &str) -> String {
    match year_num(raw_year) {
        0 => String::new(),
        y => format!("{}-{}年度", y, y + 1),
    }
}

/// Rank number (1-4) from a CAS rank label like `"2区"` or `"2 区"`.
pub fn cas_rank_number(label: &str) -> Option<u8> {
    let chars: Vec<char> = label.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if !('1'..='4').contains(c) {
            continue;
        }
        let rest = chars[i + 1..].iter().skip_while(|c| c.is_whitespace()).next();
        if rest == Some(&'区') {
            return c.to_digit(10).map(|d| d as u8);
        }
    }
    None
}

/// Sort key for HQ tier labels: `T1`..`T4` first, then `A类`/`B类`/`C类`, then everything else.
pub fn hq_level_rank(level: &str) -> u32 {
    let s = level.trim().to_uppercase();
    match s.as_str() {
        "T1" => 1,
        "T2" => 2,
        "T3" => 3,
        "T4" => 4,
        "A类" => 11,
        "B类" => 12,
        "C类" => 13,
        _ => 99,
    }
}
