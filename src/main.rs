//! Libble main entry point
//!
//! This is the command-line interface for scraping a reader's library and
//! picking the daily quote from a saved library.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use libble::config::{load_config_with_hash, Config};
use libble::crawler::Scraper;
use libble::model::Library;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Libble: harvest a reader's books and quotes
#[derive(Parser, Debug)]
#[command(name = "libble")]
#[command(version)]
#[command(about = "Scrapes a reader's books and favorite quotes", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a user's books and quotes and write the library as JSON
    Scrape {
        /// User id as it appears in the profile URL
        #[arg(value_name = "USER_ID")]
        user_id: String,

        /// Always fetch live responses
        #[arg(long)]
        no_cache: bool,

        /// Write the library here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the daily quote from a saved library
    Daily {
        /// Library JSON written by `scrape`
        #[arg(value_name = "LIBRARY")]
        library: PathBuf,

        /// Pick for this date (YYYY-MM-DD) instead of today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Scrape {
            user_id,
            no_cache,
            output,
        } => handle_scrape(config, &user_id, no_cache, output).await,
        Command::Daily { library, date } => handle_daily(&library, date),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("libble=info,warn"),
            1 => EnvFilter::new("libble=debug,info"),
            2 => EnvFilter::new("libble=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the scrape command
async fn handle_scrape(
    mut config: Config,
    user_id: &str,
    no_cache: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if no_cache {
        config.scrape.cache = false;
    }

    tracing::info!(
        "Scraping {} (cache: {})",
        user_id,
        if config.scrape.cache { "on" } else { "off" }
    );

    let scraper = Scraper::new(&config)?;
    let result = scraper
        .run(user_id)
        .await
        .with_context(|| format!("Error scraping books for {}", user_id))?;

    if !result.failed_books.is_empty() {
        tracing::warn!(
            "Quotes missing for books: {}",
            result.failed_books.join(", ")
        );
    }

    let library = Library::from_scrape(user_id, result.books, result.quotes);
    let json = serde_json::to_string_pretty(&library)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Library written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Handles the daily command
fn handle_daily(path: &Path, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read library {}", path.display()))?;
    let library: Library = serde_json::from_str(&content)
        .with_context(|| format!("Invalid library file {}", path.display()))?;

    let pick = match date {
        Some(date) => library.daily_quote_on(date)?,
        None => library.daily_quote()?,
    };

    let quote = &library.quotes[&pick.quote_id];
    let title = library
        .book_for_quote(&pick.quote_id)
        .map(|book| book.clean_title())
        .unwrap_or_else(|| "unknown book".to_string());

    println!("{}", quote.text);
    println!("  ({} likes, from {})", quote.likes, title);
    if pick.recycled {
        println!("  (recycled: every eligible quote has been seen)");
    }

    Ok(())
}
