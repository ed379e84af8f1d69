// ABOUTME: CLI for running immobilier.ch rental searches with flathunter-core.
// ABOUTME: Prints listings as JSON on stdout, logs progress to stderr, and replays saved snapshots.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flathunter_core::{
    Category, FilterCriteria, HttpSource, Pipeline, SearchOptions, SearchProfile, Snapshot,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const SNAPSHOT_PREFIX: &str = "immoCH";

/// Crawl rental listings and output JSON.
#[derive(Parser, Debug)]
#[command(name = "flathunter")]
#[command(about = "Crawl immobilier.ch rental searches and print listings as JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a live search.
    Search(SearchArgs),
    /// Re-filter listings from a saved snapshot without network access.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Listing category: flat, industrial or commercial.
    #[arg(long)]
    category: Category,

    /// Crawl exactly this many result pages instead of the discovered count.
    #[arg(long)]
    pages: Option<u32>,

    #[command(flatten)]
    bounds: Bounds,

    /// Enrich every listing before filtering instead of pre-filtering on card fields.
    #[arg(long, default_value_t = false)]
    no_prefilter: bool,

    /// Site origin to crawl instead of https://www.immobilier.ch.
    #[arg(long)]
    origin: Option<String>,

    /// Save the surviving listings as a snapshot (file path or directory).
    #[arg(long)]
    save: Option<PathBuf>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Snapshot file written by `search --save`.
    path: PathBuf,

    /// Category whose filter rules apply.
    #[arg(long, default_value = "flat")]
    category: Category,

    #[command(flatten)]
    bounds: Bounds,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

/// Filter bounds. Any given bound turns filtering on; missing rent and size bounds are open.
#[derive(Args, Debug, Default)]
struct Bounds {
    #[arg(long)]
    min_rent: Option<u32>,
    #[arg(long)]
    max_rent: Option<u32>,
    #[arg(long)]
    min_size: Option<u32>,
    #[arg(long)]
    max_size: Option<u32>,
    #[arg(long)]
    min_rooms: Option<f64>,
    #[arg(long)]
    max_rooms: Option<f64>,
}

impl Bounds {
    fn criteria(&self) -> Option<FilterCriteria> {
        let any = self.min_rent.is_some()
            || self.max_rent.is_some()
            || self.min_size.is_some()
            || self.max_size.is_some()
            || self.min_rooms.is_some()
            || self.max_rooms.is_some();
        if !any {
            return None;
        }
        Some(FilterCriteria {
            min_rent: self.min_rent.unwrap_or(0),
            max_rent: self.max_rent.unwrap_or(u32::MAX),
            min_size: self.min_size.unwrap_or(0),
            max_size: self.max_size.unwrap_or(u32::MAX),
            min_rooms: self.min_rooms,
            max_rooms: self.max_rooms,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => run_search(args),
        Command::Replay(args) => run_replay(args),
    }
}

fn run_search(args: SearchArgs) -> Result<()> {
    if args.pages == Some(0) {
        bail!("--pages must be at least 1");
    }

    let mut profile = SearchProfile::new(args.category);
    if let Some(origin) = &args.origin {
        profile = profile.with_origin(origin)?;
    }
    let criteria = args.bounds.criteria();

    let mut options = SearchOptions::default().with_prefilter(!args.no_prefilter);
    if let Some(pages) = args.pages {
        options = options.with_page_limit(pages);
    }

    let source = HttpSource::builder()
        .build()
        .context("failed to build HTTP client")?;
    let outcome = Pipeline::new(source)
        .options(options)
        .search(&profile, criteria.as_ref())?;

    if let Some(target) = &args.save {
        let path = snapshot_path(target);
        Snapshot::capture(outcome.listings.clone())
            .save(&path)
            .with_context(|| format!("failed to save snapshot to {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot saved");
    }

    let output = json!({
        "category": args.category,
        "pagesProcessed": outcome.pages_processed,
        "listings": outcome.listings,
        "diagnostics": outcome.diagnostics,
    });
    print_json(&output, args.compact)
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let snapshot = Snapshot::load(&args.path)
        .with_context(|| format!("failed to load snapshot {}", args.path.display()))?;

    let listings = match args.bounds.criteria() {
        Some(criteria) => {
            criteria.validate(args.category)?;
            snapshot.filtered(&criteria, args.category)
        }
        None => snapshot.payload.iter().collect(),
    };
    tracing::info!(
        captured_at = %snapshot.captured_at,
        total = snapshot.payload.len(),
        kept = listings.len(),
        "snapshot replayed"
    );

    let output = json!({
        "capturedAt": snapshot.captured_at,
        "listings": listings,
    });
    print_json(&output, args.compact)
}

/// A directory target gets a timestamped file name inside it.
fn snapshot_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(Snapshot::default_file_name(SNAPSHOT_PREFIX))
    } else {
        target.to_path_buf()
    }
}

fn print_json(output: &serde_json::Value, compact: bool) -> Result<()> {
    if compact {
        println!("{}", serde_json::to_string(output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(output)?);
    }
    Ok(())
}
