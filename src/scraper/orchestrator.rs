use crate::city::CityJob;
use crate::config::Config;
use crate::credentials::{CommandRefresher, CredentialProvider, CredentialRefresh};
use crate::http::HttpClient;
use crate::scraper::{CityScraper, Platform};
use crate::store::ListingStore;
use crate::{ConfigError, ImmoError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-city scrape counters
///
/// `pages` is the highest page number completed with listings; `ads` counts
/// listings seen across those pages. `done` is set only when the city
/// exhausted its results with an empty page, never on cancellation or on
/// hitting the page cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CityStats {
    pub pages: u32,
    pub ads: u64,
    pub done: bool,
}

/// One city's in-flight orchestration state
struct CityRun {
    scraper: CityScraper,
    next_page: u32,
    stats: CityStats,
    alive: bool,
}

/// Scrapes all supplied cities, interleaved round-robin at page granularity
///
/// Every alive city advances by exactly one page per sweep, so two cities
/// progress in lockstep rather than one draining before the other starts.
/// That fairness is a deliberate policy: the downstream dashboard compares
/// cities side by side and partial data should grow evenly.
///
/// Each city resumes at `last_saved_page + 1`. A city is retired when a
/// search page comes back empty (its terminal condition) or when it reaches
/// the configured page cap. Cancellation ends the whole run cleanly:
/// completed pages stay on disk and the next invocation resumes after them.
///
/// # Arguments
///
/// * `config` - Scraper configuration
/// * `jobs` - Cities to scrape, in sweep order
/// * `cancel` - Cooperative cancellation token, checked before each listing
///   fetch
///
/// # Returns
///
/// Per-city stats keyed by slug, also on cancellation; fatal request errors
/// abort the run and propagate.
pub async fn run_scraping(
    config: &Config,
    jobs: Vec<CityJob>,
    cancel: CancellationToken,
) -> Result<BTreeMap<String, CityStats>> {
    let refresher: Arc<dyn CredentialRefresh> =
        Arc::new(match CommandRefresher::from_argv(&config.credentials.refresh_command) {
            Some(refresher) => refresher,
            None => {
                return Err(ConfigError::Validation(
                    "credentials.refresh-command must not be empty".to_string(),
                )
                .into())
            }
        });

    run_scraping_with_refresher(config, jobs, cancel, refresher).await
}

/// Same as [`run_scraping`], with an injected credential refresh capability
///
/// Tests use this to avoid shelling out to the browser-automation command.
pub async fn run_scraping_with_refresher(
    config: &Config,
    jobs: Vec<CityJob>,
    cancel: CancellationToken,
    refresher: Arc<dyn CredentialRefresh>,
) -> Result<BTreeMap<String, CityStats>> {
    let store = ListingStore::new(&config.scrape.data_dir);
    let platform = Platform::new(&config.platform.base_url);

    let mut runs = Vec::with_capacity(jobs.len());
    for job in jobs {
        if job.slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "city name {:?} normalizes to an empty slug",
                job.name
            ))
            .into());
        }

        // One client and credential cache per city, mirroring one browser
        // session per search tab
        let credentials =
            CredentialProvider::new(&config.credentials.cookie_path, refresher.clone());
        let http = HttpClient::new(&config.http, platform.origin(), credentials)?;

        let next_page = store.last_saved_page(&job.slug)? + 1;
        tracing::info!(city = %job.slug, start_page = next_page, "city queued");

        runs.push(CityRun {
            scraper: CityScraper::new(job, platform.clone(), http, store.clone())?,
            next_page,
            stats: CityStats::default(),
            alive: true,
        });
    }

    let size = config.scrape.page_size;
    let max_page = config.scrape.max_page;
    let mut cancelled = false;

    'sweeps: while runs.iter().any(|r| r.alive) {
        for i in 0..runs.len() {
            if !runs[i].alive {
                continue;
            }

            let page = runs[i].next_page;
            if page > max_page {
                tracing::warn!(
                    city = %runs[i].scraper.slug(),
                    max_page,
                    "page cap reached, retiring city"
                );
                runs[i].alive = false;
                continue;
            }

            tracing::info!(city = %runs[i].scraper.slug(), page, "scraping page");
            match runs[i].scraper.scrape_page(page, size, &cancel).await {
                Ok(0) => {
                    tracing::info!(city = %runs[i].scraper.slug(), page, "empty page, city done");
                    runs[i].alive = false;
                    runs[i].stats.done = true;
                }
                Ok(count) => {
                    runs[i].stats.pages = page;
                    runs[i].stats.ads += count as u64;
                    runs[i].next_page += 1;
                    tracing::info!(
                        city = %runs[i].scraper.slug(),
                        page,
                        listings = count,
                        "page complete"
                    );
                }
                Err(ImmoError::Cancelled) => {
                    tracing::info!(
                        city = %runs[i].scraper.slug(),
                        page,
                        "stop requested, ending run"
                    );
                    cancelled = true;
                    break 'sweeps;
                }
                Err(e) => {
                    tracing::error!(
                        city = %runs[i].scraper.slug(),
                        page,
                        error = %e,
                        "page scrape failed"
                    );
                    return Err(e);
                }
            }
        }
    }

    if cancelled {
        tracing::info!("run cancelled, persisted pages remain resumable");
    }

    Ok(runs
        .into_iter()
        .map(|r| (r.scraper.slug().to_string(), r.stats))
        .collect())
}
