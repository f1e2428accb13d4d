//! Journal catalog loading.
//!
//! A catalog is the generated `search_index.json` payload:
//!
//! ```json
//! {"meta": {"generated_at": "2025-06-01T12:00:00"}, "journals": [ ... ]}
//! ```
//!
//! [`CatalogLoader`] tries each configured source in order, remembers the
//! last one that worked, and makes concurrent callers share a single load.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{Result, ScoutError};
use crate::journal::{JournalId, JournalRow};
use crate::related::{find_related, RelatedJournal};
use crate::search::{JournalIndex, SearchOptions};

/// Catalog metadata written by the data build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMeta {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub total_journals: Option<u64>,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub index_fields: Vec<String>,
}

/// An immutable, indexed journal snapshot.
#[derive(Debug)]
pub struct Catalog {
    meta: CatalogMeta,
    index: JournalIndex,
}

impl Catalog {
    pub fn new(meta: CatalogMeta, rows: Vec<JournalRow>) -> Self {
        Self {
            meta,
            index: JournalIndex::new(rows),
        }
    }

    /// Parse a catalog payload.
    ///
    /// `source` only labels errors. Individual rows that are not JSON objects
    /// are skipped; a payload whose `journals` is not an array is rejected.
    pub fn from_json(text: &str, source: &str) -> Result<Self> {
        let payload: Value = serde_json::from_str(text)?;
        let invalid = |reason: &str| ScoutError::InvalidPayload {
            source_path: source.to_string(),
            reason: reason.to_string(),
        };

        let Value::Object(mut object) = payload else {
            return Err(invalid("payload is not an object"));
        };
        let Some(Value::Array(journals)) = object.remove("journals") else {
            return Err(invalid("`journals` is not an array"));
        };
        let meta = match object.remove("meta") {
            Some(meta @ Value::Object(_)) => serde_json::from_value(meta).unwrap_or_default(),
            _ => CatalogMeta::default(),
        };

        let total = journals.len();
        let rows: Vec<JournalRow> = journals
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();
        if rows.len() < total {
            warn!(source, skipped = total - rows.len(), "skipped malformed journal rows");
        }

        Ok(Self::new(meta, rows))
    }

    pub fn meta(&self) -> &CatalogMeta {
        &self.meta
    }

    pub fn index(&self) -> &JournalIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &JournalRow> {
        self.index.rows()
    }

    /// Row by id (the detail page's `id` parameter).
    pub fn find_by_id(&self, id: JournalId) -> Option<&JournalRow> {
        self.index.get(id)
    }

    /// Row whose title equals `title`, ignoring case.
    pub fn find_by_title(&self, title: &str) -> Option<&JournalRow> {
        let wanted = title.trim().to_uppercase();
        self.rows().find(|r| r.title_str().to_uppercase() == wanted)
    }

    /// Ranked suggestions for a query.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<&JournalRow> {
        self.index.search(query, options)
    }

    /// Journals related to `pivot` within this catalog.
    pub fn related(&self, pivot: &JournalRow, limit: usize) -> Vec<RelatedJournal<'_>> {
        find_related(pivot, self.rows(), limit)
    }
}

/// Persistence for the last data source that loaded successfully.
#[derive(Debug, Clone)]
pub struct PathMemory {
    file: Option<PathBuf>,
}

impl PathMemory {
    /// Memory backed by a file.
    pub fn at(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
        }
    }

    /// Memory that never stores anything.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Default location under the user cache directory.
    pub fn default_location() -> Self {
        Self {
            file: dirs::cache_dir().map(|d| d.join("journal-scout").join("data_path")),
        }
    }

    pub fn recall(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        let text = std::fs::read_to_string(file).ok()?;
        let path = text.trim();
        (!path.is_empty()).then(|| path.to_string())
    }

    pub fn remember(&self, source: &str) {
        let Some(file) = &self.file else {
            return;
        };
        if let Some(dir) = file.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                warn!(dir = %dir.display(), %err, "cannot create cache directory");
                return;
            }
        }
        if let Err(err) = std::fs::write(file, source) {
            warn!(file = %file.display(), %err, "cannot remember data path");
        }
    }

    pub fn forget(&self) {
        let Some(file) = &self.file else {
            return;
        };
        match std::fs::remove_file(file) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(file = %file.display(), %err, "cannot forget data path"),
        }
    }
}

/// Ordered sources to try: the remembered one first when it is still a
/// configured candidate. A stale remembered source is forgotten.
pub fn candidate_sources(configured: &[String], memory: &PathMemory) -> Vec<String> {
    let Some(remembered) = memory.recall() else {
        return configured.to_vec();
    };
    if !configured.contains(&remembered) {
        debug!(remembered = remembered.as_str(), "forgetting stale data path");
        memory.forget();
        return configured.to_vec();
    }

    let mut out = Vec::with_capacity(configured.len());
    for source in std::iter::once(&remembered).chain(configured) {
        if !out.contains(source) {
            out.push(source.clone());
        }
    }
    out
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read one source (local file or HTTP URL) into a catalog.
pub async fn load_source(source: &str) -> Result<Catalog> {
    let text = if is_remote(source) {
        let response = reqwest::get(source).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::Http(format!("HTTP {} from {}", status.as_u16(), source)));
        }
        response.text().await?
    } else {
        tokio::fs::read_to_string(Path::new(source))
            .await
            .map_err(|e| ScoutError::Io(format!("{}: {}", source, e)))?
    };
    Catalog::from_json(&text, source)
}

/// Try each source in order; the first success is remembered and returned.
pub async fn load_with_fallback(sources: &[String], memory: &PathMemory) -> Result<(String, Catalog)> {
    let candidates = candidate_sources(sources, memory);
    if candidates.is_empty() {
        return Err(ScoutError::NoSources);
    }

    let mut last_error = None;
    for source in &candidates {
        debug!(source = source.as_str(), "trying data source");
        match load_source(source).await {
            Ok(catalog) => {
                info!(source = source.as_str(), journals = catalog.len(), "catalog loaded");
                memory.remember(source);
                return Ok((source.clone(), catalog));
            }
            Err(err) => {
                warn!(source = source.as_str(), %err, "data source failed");
                last_error = Some(err);
            }
        }
    }

    Err(ScoutError::AllSourcesFailed {
        attempts: candidates.len(),
        last: Box::new(last_error.unwrap_or(ScoutError::NoSources)),
    })
}

/// Loads the catalog at most once.
///
/// Concurrent callers of [`CatalogLoader::ensure_ready`] await the same
/// in-flight load. The outcome, success or failure, is kept for the
/// lifetime of the loader.
pub struct CatalogLoader {
    sources: Vec<String>,
    memory: PathMemory,
    cell: OnceCell<std::result::Result<Arc<Catalog>, ScoutError>>,
}

impl CatalogLoader {
    pub fn new(sources: Vec<String>, memory: PathMemory) -> Self {
        Self {
            sources,
            memory,
            cell: OnceCell::new(),
        }
    }

    /// Loader for a data configuration.
    pub fn from_config(config: &DataConfig) -> Self {
        let memory = match (&config.cache_file, config.remember_path) {
            (_, false) => PathMemory::disabled(),
            (Some(file), true) => PathMemory::at(file),
            (None, true) => PathMemory::default_location(),
        };
        Self::new(config.paths.clone(), memory)
    }

    /// Whether a catalog has been loaded successfully.
    pub fn is_ready(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }

    /// The loaded catalog, loading it first if needed.
    pub async fn ensure_ready(&self) -> Result<Arc<Catalog>> {
        self.cell
            .get_or_init(|| async {
                load_with_fallback(&self.sources, &self.memory)
                    .await
                    .map(|(_, catalog)| Arc::new(catalog))
            })
            .await
            .clone()
    }
}
