use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use venuesync::api::{FeedClient, KakaoClient};
use venuesync::bookmark::BookmarkService;
use venuesync::config::FileConfig;
use venuesync::db::{SqliteStoreRepository, StoreRepository, open_db};
use venuesync::domain::BookmarkRequest;
use venuesync::ingest::{IngestReport, ingest_all, ingest_page, page_window};
use venuesync::logging;

/// Ingest open-data food venues, enrich them with Kakao Local data, and
/// manage bookmarks on the resulting store list
///
/// Examples:
///   # Ingest the first 100 feed rows
///   venuesync ingest --start 1 --end 100
///
///   # Walk the whole feed, 1000 rows per request
///   venuesync ingest --all --page-size 1000
///
///   # Bookmark a store
///   venuesync folder --user 1 --name "Lunch"
///   venuesync bookmark --folder 1 --store 10332413
#[derive(Parser, Debug)]
#[command(name = "venuesync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches venuesync.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (defaults to venuesync.db)
    #[arg(short = 'd', long, global = true)]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch feed rows, enrich them and store the new ones
    Ingest {
        /// First feed row to request (1-based)
        #[arg(long, default_value = "1")]
        start: u32,

        /// Last feed row to request (defaults to and is capped at start + page size - 1)
        #[arg(long)]
        end: Option<u32>,

        /// Keep paging until the feed's total count is covered
        #[arg(long)]
        all: bool,

        /// Rows per feed request (max 1000)
        #[arg(long)]
        page_size: Option<u32>,

        /// Open-data feed API key
        #[arg(long, env = "VENUESYNC_FEED_KEY", hide_env_values = true)]
        feed_key: Option<String>,

        /// Kakao REST API key
        #[arg(long, env = "VENUESYNC_KAKAO_KEY", hide_env_values = true)]
        kakao_key: Option<String>,
    },

    /// Create a bookmark folder for a user
    Folder {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        name: String,
    },

    /// Bookmark a store into a folder
    Bookmark {
        #[arg(long)]
        folder: i64,
        #[arg(long)]
        store: i64,
    },

    /// List the bookmarks in a folder
    Bookmarks {
        #[arg(long)]
        folder: i64,
    },

    /// Show one stored venue
    Store { id: i64 },
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        FileConfig::from_path(config_path)?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let database = args
        .database
        .clone()
        .unwrap_or_else(|| file_config.database_path());
    let conn = open_db(&database)
        .with_context(|| format!("Failed to open database: {}", database.display()))?;

    match args.command {
        Command::Ingest {
            start,
            end,
            all,
            page_size,
            feed_key,
            kakao_key,
        } => {
            let mut feed_config = file_config.feed_or_default();
            if let Some(key) = feed_key {
                feed_config.key = Some(key);
            }
            if let Some(size) = page_size {
                feed_config.page_size = size;
            }
            let mut kakao_config = file_config.kakao_or_default();
            if let Some(key) = kakao_key {
                kakao_config.api_key = Some(key);
            }

            let feed = FeedClient::new(&feed_config).context("Failed to set up feed client")?;
            let kakao =
                KakaoClient::new(&kakao_config).context("Failed to set up Kakao client")?;
            let repo = SqliteStoreRepository::new(&conn);
            let page_size = feed_config.effective_page_size();
            let (start, window_end) = page_window(start, end, page_size);
            if all && end.is_some() {
                tracing::warn!("--end is ignored with --all");
            } else if let Some(requested) = end {
                if requested < start {
                    bail!("--end ({}) must not be before --start ({})", requested, start);
                }
                if window_end < requested {
                    tracing::warn!(requested, end = window_end, page_size, "--end clamped to one page");
                }
            }

            let spinner = create_spinner("Ingesting feed...");
            let started = Instant::now();
            let report = if all {
                ingest_all(&feed, &kakao, &repo, start, page_size, |progress| {
                    spinner.set_message(format!(
                        "Ingesting feed... {}/{} rows, {} new stores",
                        progress.fetched, progress.total_available, progress.inserted
                    ));
                })
                .context("Feed ingestion aborted")?
            } else {
                ingest_page(&feed, &kakao, &repo, start, window_end)
                    .context("Feed ingestion aborted")?
                    .unwrap_or_default()
            };
            spinner.finish_with_message(format!(
                "Ingested {} rows [{:.1}s]",
                report.fetched,
                started.elapsed().as_secs_f32()
            ));

            print_report(&report, repo.count()?);
        }
        Command::Folder { user, name } => {
            let folder = BookmarkService::new(&conn).create_folder(user, &name)?;
            println!("Created folder {} ({}) for user {}", folder.id, folder.name, folder.user_id);
        }
        Command::Bookmark { folder, store } => {
            let bookmark = BookmarkService::new(&conn).bookmark(BookmarkRequest {
                folder_id: folder,
                store_id: store,
            })?;
            println!(
                "Bookmarked store {} into folder {} (bookmark {})",
                bookmark.store_id, bookmark.folder_id, bookmark.id
            );
        }
        Command::Bookmarks { folder } => {
            let service = BookmarkService::new(&conn);
            let repo = SqliteStoreRepository::new(&conn);
            for bookmark in service.list(folder)? {
                match repo.find(bookmark.store_id)? {
                    Some(store) => println!("{:>12}  {}  [{}]", store.id, store.name, store.category),
                    None => println!("{:>12}  (missing store)", bookmark.store_id),
                }
            }
        }
        Command::Store { id } => {
            let Some(store) = SqliteStoreRepository::new(&conn).find(id)? else {
                bail!("Store not found: {}", id);
            };
            println!("{} ({})", store.name, store.id);
            println!("  Category:  {}", store.category);
            println!("  Address:   {}", store.address);
            if let Some(ref phone) = store.phone {
                println!("  Phone:     {}", phone);
            }
            println!("  Location:  ({:.6}, {:.6})", store.latitude, store.longitude);
            println!("  Bookmarks: {}", store.bookmark_count);
        }
    }

    Ok(())
}

fn print_report(report: &IngestReport, stored_total: u64) {
    println!();
    println!("Ingestion summary");
    println!("=================");
    println!("  Pages requested:      {}", report.pages);
    println!("  Rows in feed:         {}", report.total_available);
    println!("  Rows fetched:         {}", report.fetched);
    println!("  Enriched:             {}", report.enriched);
    println!("  No address match:     {}", report.no_address_match);
    println!("  Not food or cafe:     {}", report.category_rejected);
    println!("  Lookup failures:      {}", report.lookup_failed);
    println!("  Discarded:            {}", report.discarded);
    println!("  New stores:           {}", report.inserted);
    println!("  Already stored:       {}", report.skipped_existing);
    println!();
    println!("Stores in database: {}", stored_total);
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
