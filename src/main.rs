//! Podcast-Catalog main entry point
//!
//! This is the command-line interface for building the local podcast catalog.

use anyhow::Context;
use clap::{Parser, Subcommand};
use podcast_catalog::catalog::{
    details_request_options, fetch_details, fetch_genres, fetch_shows, load_genres, load_shows,
    save_details, save_genres, save_shows, shows_request_options,
};
use podcast_catalog::config::{load_config_with_hash, Config};
use podcast_catalog::crawler::{build_http_client, Dispatcher};
use podcast_catalog::CatalogError;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Podcast-Catalog: a local catalog of podcast directory metadata
///
/// Fetches genre and show directory pages plus the lookup API and stores the
/// decoded records as JSON files.
#[derive(Parser, Debug)]
#[command(name = "podcast-catalog")]
#[command(version = "1.0.0")]
#[command(about = "Builds a local catalog of podcast metadata", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

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
    /// Fetch the genre directory page and save every genre
    Genres,

    /// Collect shows from every saved genre's page
    Shows,

    /// Look up details for every saved show
    Details,

    /// Run genres, shows and details in sequence
    All,

    /// Validate config and show what would be fetched without fetching
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let client = build_http_client(&config.user_agent, &config.crawler)?;
    let dispatcher = Dispatcher::new(client);

    match cli.command {
        Command::Check => handle_check(&config),
        Command::Genres => handle_genres(&config, &dispatcher).await?,
        Command::Shows => handle_shows(&config, &dispatcher).await?,
        Command::Details => handle_details(&config, &dispatcher).await?,
        Command::All => {
            handle_genres(&config, &dispatcher).await?;
            handle_shows(&config, &dispatcher).await?;
            handle_details(&config, &dispatcher).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("podcast_catalog=info,warn"),
            1 => EnvFilter::new("podcast_catalog=debug,info"),
            2 => EnvFilter::new("podcast_catalog=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `check`: prints the effective configuration
fn handle_check(config: &Config) {
    println!("=== Podcast-Catalog Check ===\n");

    println!("Crawler:");
    println!("  Start interval: {}ms", config.crawler.min_interval);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nCatalog:");
    println!("  Genres page: {}", config.catalog.genres_url);
    println!("  Genre selector: {}", config.catalog.genre_selector);
    println!("  Show selector: {}", config.catalog.show_selector);
    println!("  Lookup base: {}", config.catalog.lookup_base);

    println!("\nOutput:");
    println!("  Genres: {}", config.output.genres_path);
    println!("  Shows: {}", config.output.shows_path);
    println!("  Details: {}", config.output.details_path);

    println!("\n✓ Configuration is valid");
}

async fn handle_genres(config: &Config, dispatcher: &Dispatcher) -> Result<(), CatalogError> {
    let genres = fetch_genres(
        dispatcher.client(),
        &config.catalog.genres_url,
        &config.catalog.genre_selector,
    )
    .await?;

    save_genres(Path::new(&config.output.genres_path), &genres)?;
    println!(
        "✓ {} genres saved to {}",
        genres.len(),
        config.output.genres_path
    );
    Ok(())
}

async fn handle_shows(config: &Config, dispatcher: &Dispatcher) -> Result<(), CatalogError> {
    let genres = load_genres(Path::new(&config.output.genres_path))?;
    let options = shows_request_options(&genres, &config.catalog.show_selector)
        .with_min_interval(config.crawler.min_interval());

    let shows = fetch_shows(dispatcher, &options).await?;

    save_shows(Path::new(&config.output.shows_path), &shows.successes)?;
    println!(
        "✓ {} shows saved to {} ({} genre pages failed)",
        shows.successes.len(),
        config.output.shows_path,
        shows.failures.len()
    );
    Ok(())
}

async fn handle_details(config: &Config, dispatcher: &Dispatcher) -> Result<(), CatalogError> {
    let shows = load_shows(Path::new(&config.output.shows_path))?;
    let options = details_request_options(
        &shows,
        &config.catalog.lookup_base,
        config.crawler.min_interval(),
    );

    let details = fetch_details(dispatcher, &options).await;

    save_details(Path::new(&config.output.details_path), &details.successes)?;
    println!(
        "✓ {} show details saved to {} ({} lookups failed)",
        details.successes.len(),
        config.output.details_path,
        details.failures.len()
    );
    Ok(())
}
