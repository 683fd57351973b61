//! immoduel main entry point
//!
//! Command-line interface for the city-versus-city listings scraper.

use anyhow::{bail, Context};
use clap::Parser;
use immoduel::cancel::{clear_stop_flag, spawn_stop_flag_watcher};
use immoduel::config::{load_config, Config};
use immoduel::credentials::CredentialProvider;
use immoduel::http::HttpClient;
use immoduel::locations::location_autocomplete;
use immoduel::output::{print_store_summary, scan_store};
use immoduel::scraper::Platform;
use immoduel::store::ListingStore;
use immoduel::{run_scraping, CityJob};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// immoduel: scrape and compare rental listings between French cities
///
/// Resolves each city against the platform's location autocomplete, then
/// scrapes its paginated search results into a filesystem store of raw JSON
/// artifacts. Runs are resumable; touching the stop flag file requests a
/// clean stop.
#[derive(Parser, Debug)]
#[command(name = "immoduel")]
#[command(version)]
#[command(about = "Scrape and compare rental listings between cities", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Cities to scrape, e.g. "Lyon" "Bordeaux"
    #[arg(value_name = "CITY")]
    cities: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show per-city artifact counts from the store and exit
    #[arg(long, conflicts_with = "cities")]
    stats: bool,

    /// Extract records for one city and print a summary
    #[arg(long, value_name = "CITY", conflicts_with_all = ["cities", "stats"])]
    records: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.stats {
        handle_stats(&config)?;
    } else if let Some(city) = &cli.records {
        handle_records(&config, city)?;
    } else {
        handle_scrape(&config, &cli.cities).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("immoduel=info,warn"),
            1 => EnvFilter::new("immoduel=debug,info"),
            2 => EnvFilter::new("immoduel=trace,debug"),
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

/// Handles the --stats mode: prints artifact counts per city
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = ListingStore::new(&config.scrape.data_dir);
    let rows = scan_store(&store)?;
    print_store_summary(&rows);
    Ok(())
}

/// Handles the --records mode: extracts and summarizes one city's listings
fn handle_records(config: &Config, city: &str) -> anyhow::Result<()> {
    let slug = immoduel::normalize_city(city);
    let store = ListingStore::new(&config.scrape.data_dir);
    let records = immoduel::records::load_city_records(&store, &slug)?;

    if records.is_empty() {
        println!("No extractable listings for {}", slug);
        return Ok(());
    }

    let prices: Vec<f64> = records.iter().filter_map(|r| r.price_value).collect();
    let per_m2: Vec<f64> = records.iter().filter_map(|r| r.price_per_m2).collect();

    println!("City: {}", slug);
    println!("Listings: {}", records.len());
    if !prices.is_empty() {
        println!(
            "Average rent: {:.0}",
            prices.iter().sum::<f64>() / prices.len() as f64
        );
    }
    if !per_m2.is_empty() {
        println!(
            "Average rent per m2: {:.1}",
            per_m2.iter().sum::<f64>() / per_m2.len() as f64
        );
    }

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, cities: &[String]) -> anyhow::Result<()> {
    if cities.is_empty() {
        bail!("no cities given; pass one or more city names, or --stats");
    }

    // Resolve city names into location ids over one short-lived session
    let jobs = resolve_cities(config, cities).await?;
    for job in &jobs {
        tracing::info!(city = %job.name, slug = %job.slug, id = %job.location_id, "city resolved");
    }

    // A stale stop flag would cancel the run before it starts
    let flag_path = Path::new(&config.scrape.stop_flag).to_path_buf();
    clear_stop_flag(&flag_path)?;

    let cancel = CancellationToken::new();
    let watcher = spawn_stop_flag_watcher(flag_path, cancel.clone(), Duration::from_millis(500));

    // Ctrl-C requests the same cooperative stop as the flag
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, finishing current listing");
            ctrl_c_token.cancel();
        }
    });

    let stats = run_scraping(config, jobs, cancel.clone()).await?;

    cancel.cancel();
    watcher.await.ok();

    println!("{:<24} {:>8} {:>8} {:>8}", "City", "Pages", "Ads", "Done");
    for (slug, city_stats) in &stats {
        println!(
            "{:<24} {:>8} {:>8} {:>8}",
            slug, city_stats.pages, city_stats.ads, city_stats.done
        );
    }

    Ok(())
}

/// Resolves each city name into a [`CityJob`] via the autocomplete endpoint
async fn resolve_cities(config: &Config, cities: &[String]) -> anyhow::Result<Vec<CityJob>> {
    let platform = Platform::new(&config.platform.base_url);
    let refresher = immoduel::credentials::CommandRefresher::from_argv(
        &config.credentials.refresh_command,
    )
    .context("credentials.refresh-command must not be empty")?;
    let credentials =
        CredentialProvider::new(&config.credentials.cookie_path, Arc::new(refresher));
    let mut http = HttpClient::new(&config.http, platform.origin(), credentials)?;

    let mut jobs = Vec::with_capacity(cities.len());
    for city in cities {
        match location_autocomplete(&mut http, &platform, city).await? {
            Some(found) => jobs.push(CityJob::new(found.label, found.id)),
            None => bail!("no location found for {:?}", city),
        }
    }
    Ok(jobs)
}
