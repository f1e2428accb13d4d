//! Journal Scout - journal catalog lookup
//!
//! This crate provides the lookup core behind a journal search box and
//! journal detail page:
//!
//! - **Journal**: Catalog rows (impact factor, JCR/CAS rankings, HQ catalog, Chinese core lists)
//! - **Normalize**: Search haystacks, acronym queries, and title abbreviation variants
//! - **Classify**: Display badges derived from row fields and free-form tags
//! - **Search**: Ranked instant suggestions over a memoized index
//! - **Related**: Similar journals by CAS category, rankings, and impact factor
//! - **Catalog**: Dataset loading with path fallback and a single shared load
//! - **Filter**: Session IF threshold and the `> filter if > N` command
//! - **Stats**: HQ field parse statistics
//! - **Config**: Data sources and default limits
//!
//! # Example
//!
//! ```
//! use journal_scout::{classify, JournalIndex, JournalRow, SearchOptions};
//!
//! let mut jacs = JournalRow::new(1, "Journal of the American Chemical Society");
//! jacs.jcr_quartile = Some("Q1".to_string());
//! let index = JournalIndex::new(vec![jacs, JournalRow::new(2, "Nature")]);
//!
//! let hits = index.search("jacs", &SearchOptions::default());
//! assert_eq!(hits[0].id, 1);
//! assert_eq!(classify(hits[0])[0].text, "JCR Q1");
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod journal;
pub mod normalize;
pub mod related;
pub mod search;
pub mod stats;

pub use catalog::{Catalog, CatalogLoader, CatalogMeta, PathMemory};
pub use classify::{classify, Badge, BadgeStyle};
pub use config::{DataConfig, RelatedConfig, ScoutConfig, SearchConfig};
pub use error::{Result, ScoutError};
pub use filter::{parse_filter_command, SessionCommand, SessionState};
pub use journal::{CasRecord, CasSubcategory, HqRecord, IfRecord, JournalId, JournalRow};
pub use normalize::{haystack, is_abbr_query, normalize_abbr_query, title_abbr_variants};
pub use related::{compute_similarity, find_related, CasProfile, RelatedJournal, Similarity};
pub use search::{score_row, IndexedJournal, JournalIndex, SearchOptions};
pub use stats::{FieldStat, FieldStatus, StatsSummary};
