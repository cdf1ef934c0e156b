//! Orweja Agenda CLI
//!
//! Local entry point for fetching and inspecting the competition agenda.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use orweja_agenda::{
    error::{AppError, Result},
    models::{Config, EnrollmentStatus, Match, MatchFilter, MatchType},
    services::{MatchAggregator, SourceFetcher},
    state::{MatchManager, RefreshOutcome},
    storage::{load_snapshot, LocalCache},
};

/// Orweja Agenda - hunting-dog competition agenda scraper
#[derive(Parser, Debug)]
#[command(
    name = "orweja-agenda",
    version,
    about = "Fetches the Orweja competition agenda"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "agenda.toml")]
    config: PathBuf,

    /// Cache directory (overrides the configured one)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the agenda and print the matches
    Fetch {
        /// Only this competition type (map, sjp, veldproef, working-test, jeugdproef)
        #[arg(long)]
        match_type: Option<MatchType>,

        /// Only matches whose enrollment has this status (open, closed, full, upcoming)
        #[arg(long)]
        status: Option<EnrollmentStatus>,

        /// Only matches mentioning this text in title, location, or club
        #[arg(long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the cached snapshot without touching the network
    Cache,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let cache_dir = cli
        .cache_dir
        .clone()
        .unwrap_or_else(|| config.cache.dir.clone());

    match cli.command {
        Command::Fetch {
            match_type,
            status,
            search,
            json,
        } => {
            let fetcher = Arc::new(SourceFetcher::new(&config.fetcher)?);
            let source = Arc::new(MatchAggregator::new(fetcher, config.sources.clone()));
            let cache = Arc::new(LocalCache::new(&cache_dir));
            let manager = MatchManager::new(source, cache);

            match manager.refresh().await {
                RefreshOutcome::Refreshed { count } => {
                    log::info!("Fetched {count} matches");
                }
                RefreshOutcome::Offline { count } if count > 0 => {
                    log::warn!(
                        "All sources failed; showing {count} matches from the cached snapshot"
                    );
                }
                RefreshOutcome::Offline { .. } => {
                    log::error!("All sources failed and no snapshot is cached");
                    return Err(AppError::AllSourcesFailed);
                }
                RefreshOutcome::AlreadyRefreshing => {}
            }

            let filter = MatchFilter {
                match_type,
                status,
                query: search,
            };
            let matches = manager.filtered_matches(&filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                print_matches(&matches);
            }
        }

        Command::Cache => {
            let cache = LocalCache::new(&cache_dir);
            match load_snapshot(&cache).await? {
                Some(snapshot) => {
                    let age = Utc::now().signed_duration_since(snapshot.saved_at);
                    log::info!(
                        "Snapshot from {} UTC ({} old), {} matches",
                        snapshot.saved_at.format("%Y-%m-%d %H:%M"),
                        format_age(age),
                        snapshot.count
                    );
                    print_matches(&snapshot.matches);
                }
                None => {
                    log::info!("No snapshot saved yet. Run 'fetch' first.");
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration from {}...", cli.config.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} sources, cache dir: {})",
                config.sources.len(),
                cache_dir.display()
            );

            log::info!("All validations passed!");
        }
    }

    Ok(())
}

/// Print matches as a fixed-width table on stdout.
fn print_matches(matches: &[Match]) {
    if matches.is_empty() {
        println!("No matches.");
        return;
    }

    println!(
        "{:<12} {:<14} {:<42} {:<22} {}",
        "DATE", "TYPE", "TITLE", "LOCATION", "STATUS"
    );
    for m in matches {
        println!(
            "{:<12} {:<14} {:<42} {:<22} {}",
            m.event_date.format("%d-%m-%Y"),
            m.match_type.as_str(),
            truncate(&m.title, 40),
            truncate(&m.location, 20),
            m.enrollment_status().as_str()
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn format_age(age: chrono::Duration) -> String {
    if age.num_days() > 0 {
        format!("{}d", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h", age.num_hours())
    } else {
        format!("{}m", age.num_minutes().max(0))
    }
}
