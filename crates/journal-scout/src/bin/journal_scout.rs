//! journal-scout - search a journal catalog from the command line
//!
//! ```bash
//! journal-scout search "jacs" --min-if 5
//! journal-scout show 42
//! journal-scout related 42 --limit 10
//! journal-scout stats ./data/hq_field_stats.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use journal_scout::normalize::{format_if_academic_year, hq_level_rank};
use journal_scout::stats::{parse_field_stats, sorted_by_index};
use journal_scout::{
    classify, Badge, Catalog, CatalogLoader, JournalId, JournalRow, ScoutConfig, ScoutError,
    SearchOptions, StatsSummary,
};

#[derive(Parser)]
#[command(name = "journal-scout")]
#[command(version, about = "Journal catalog search, badges and related journals", long_about = None)]
struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog source (file or URL); repeat to try several in order
    #[arg(short, long, global = true)]
    data: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ranked suggestions for a title, ISSN, CN number or acronym
    Search {
        query: String,

        /// Maximum number of suggestions
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only journals with impact factor >= this value
        #[arg(long)]
        min_if: Option<f64>,
    },

    /// One journal with its badges and CAS profile
    Show { id: JournalId },

    /// Journals related to a journal
    Related {
        id: JournalId,

        /// Maximum number of related journals
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Summarize an HQ field statistics file
    Stats { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut config = match &cli.config {
        Some(path) => ScoutConfig::from_file(path)?,
        None => ScoutConfig::default(),
    };
    if !cli.data.is_empty() {
        config.data.paths = cli.data.clone();
    }
    config.validate()?;

    match cli.command {
        Commands::Search {
            query,
            limit,
            min_if,
        } => {
            let catalog = load(&config).await?;
            let options = SearchOptions {
                limit: limit.unwrap_or(config.search.suggestion_limit),
                min_if: min_if.or(config.search.min_if),
            };
            let hits = catalog.index().search_scored(&query, &options);
            if hits.is_empty() {
                println!("No journals match \"{}\"", query);
                return Ok(());
            }

            let mut table = new_table(&["ID", "Title", "ISSN / CN", "IF", "Badges", "Score"]);
            for (row, score) in hits {
                table.add_row(vec![
                    row.id.to_string(),
                    row.title_str().to_string(),
                    identifiers(row),
                    format_if(row),
                    badge_line(&classify(row)),
                    format!("{:.1}", score),
                ]);
            }
            println!("{table}");
        }

        Commands::Show { id } => {
            let catalog = load(&config).await?;
            let row = find(&catalog, id)?;
            print_detail(row);
        }

        Commands::Related { id, limit } => {
            let catalog = load(&config).await?;
            let pivot = find(&catalog, id)?;
            let related = catalog.related(pivot, limit.unwrap_or(config.related.limit));
            if related.is_empty() {
                println!("No related journals for {}", pivot.title_str());
                return Ok(());
            }

            println!("Related to {}", pivot.title_str());
            let mut table = new_table(&["ID", "Title", "IF", "Score", "Reasons"]);
            for item in related {
                table.add_row(vec![
                    item.journal.id.to_string(),
                    item.journal.title_str().to_string(),
                    format_if(item.journal),
                    format!("{:.1}", item.score),
                    item.reasons.join("; "),
                ]);
            }
            println!("{table}");
        }

        Commands::Stats { file } => {
            let text = std::fs::read_to_string(&file)?;
            let rows = parse_field_stats(&text)?;
            let summary = StatsSummary::from_rows(&rows);
            println!(
                "Fields {}  matched {}  unmatched {}  declared {}  parsed {}  unique {}",
                summary.total,
                summary.matched,
                summary.unmatched,
                summary.declared_sum,
                summary.parsed_sum,
                summary.unique_sum
            );

            let mut table = new_table(&["#", "Field", "Society", "Declared", "Parsed", "Unique", "Status"]);
            for stat in sorted_by_index(&rows) {
                table.add_row(vec![
                    stat.index.to_string(),
                    dash(stat.field.as_deref()),
                    dash(stat.society.as_deref()),
                    stat.declared_count.to_string(),
                    stat.parsed_count.to_string(),
                    stat.parsed_unique_count.to_string(),
                    stat.status().to_string(),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}

async fn load(config: &ScoutConfig) -> Result<Arc<Catalog>, ScoutError> {
    debug!(sources = ?config.data.paths, "loading catalog");
    CatalogLoader::from_config(&config.data).ensure_ready().await
}

fn find(catalog: &Catalog, id: JournalId) -> Result<&JournalRow, ScoutError> {
    catalog
        .find_by_id(id)
        .ok_or_else(|| ScoutError::NotFound(id.to_string()))
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

fn identifiers(row: &JournalRow) -> String {
    let ids: Vec<&str> = [row.issn_str(), row.cn_number_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(" / ")
    }
}

fn format_if(row: &JournalRow) -> String {
    row.impact_factor()
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn badge_line(badges: &[Badge]) -> String {
    badges
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn print_detail(row: &JournalRow) {
    let mut table = new_table(&["Field", "Value"]);
    let if_label = match row.if_year.as_deref().map(format_if_academic_year) {
        Some(year) if !year.is_empty() => format!("{} ({})", format_if(row), year),
        _ => format_if(row),
    };
    table.add_row(vec!["Title".to_string(), dash(row.title.as_deref())]);
    table.add_row(vec!["ISSN".to_string(), dash(row.issn.as_deref())]);
    table.add_row(vec!["eISSN".to_string(), dash(row.eissn.as_deref())]);
    table.add_row(vec!["CN".to_string(), dash(row.cn_number.as_deref())]);
    table.add_row(vec!["Publisher".to_string(), dash(row.publisher.as_deref())]);
    table.add_row(vec!["Impact factor".to_string(), if_label]);
    table.add_row(vec!["Badges".to_string(), badge_line(&classify(row))]);

    if let Some(cas) = row.latest_cas_record() {
        let subcategories: Vec<String> = cas
            .subcategories
            .iter()
            .filter_map(|s| {
                let name = s.name.as_deref()?.trim();
                (!name.is_empty()).then(|| match s.rank.as_deref() {
                    Some(rank) if !rank.trim().is_empty() => format!("{} ({})", name, rank.trim()),
                    _ => name.to_string(),
                })
            })
            .collect();
        table.add_row(vec![
            "CAS".to_string(),
            format!(
                "{} {} {}",
                dash(cas.year.as_deref()),
                dash(cas.category.as_deref()),
                dash(cas.rank.as_deref())
            ),
        ]);
        if !subcategories.is_empty() {
            table.add_row(vec!["CAS subcategories".to_string(), subcategories.join("; ")]);
        }
    }

    let mut hq: Vec<_> = row.hq_records.iter().collect();
    hq.sort_by_key(|r| hq_level_rank(r.level.as_deref().unwrap_or_default()));
    for record in hq {
        table.add_row(vec![
            "HQ".to_string(),
            format!(
                "{} / {} / {}",
                dash(record.field.as_deref()),
                dash(record.society.as_deref()),
                dash(record.level.as_deref())
            ),
        ]);
    }

    println!("{table}");
}
