use crate::city::CityJob;
use crate::http::HttpClient;
use crate::scraper::{Platform, SearchRequest, SearchResponse};
use crate::store::ListingStore;
use crate::{ImmoError, Result};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// Drives the pagination loop for a single city
///
/// One page step runs fetch-page → extract-ids → fetch-listings → save-page.
/// Listings are persisted incrementally; the page artifact is written last
/// and is the completion checkpoint for that page number.
pub struct CityScraper {
    job: CityJob,
    platform: Platform,
    http: HttpClient,
    store: ListingStore,
}

impl CityScraper {
    /// Creates a scraper and its per-city store directories
    pub fn new(
        job: CityJob,
        platform: Platform,
        http: HttpClient,
        store: ListingStore,
    ) -> Result<Self> {
        store.ensure_city(&job.slug)?;
        Ok(Self {
            job,
            platform,
            http,
            store,
        })
    }

    /// City slug this scraper writes under
    pub fn slug(&self) -> &str {
        &self.job.slug
    }

    /// Executes one page step and returns the number of listings seen
    ///
    /// Zero means the city is exhausted: nothing is persisted for an empty
    /// page and the caller retires the city. A set cancellation token
    /// surfaces as [`ImmoError::Cancelled`] before the next listing fetch;
    /// in that case the current page artifact is not written, so the page
    /// is retried in full on the next run.
    pub async fn scrape_page(
        &mut self,
        page: u32,
        size: u32,
        cancel: &CancellationToken,
    ) -> Result<usize> {
        let (ids, raw) = self.search_page(page, size).await?;
        if ids.is_empty() {
            return Ok(0);
        }

        for id in &ids {
            self.scrape_listing(id, cancel).await?;
        }

        self.store.save_page(&self.job.slug, page, &raw)?;
        Ok(ids.len())
    }

    /// Fetches one search page and returns (listing ids, raw body)
    async fn search_page(&mut self, page: u32, size: u32) -> Result<(Vec<String>, String)> {
        let url = self.platform.search_url();
        let referer = self.platform.search_referer(&self.job.location_id);
        let payload = serde_json::to_string(&SearchRequest::rentals(
            &self.job.location_id,
            page,
            size,
        ))?;

        let response = self
            .http
            .request(Method::POST, &url, Some(payload), Some(&referer))
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImmoError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let raw = response.text().await.map_err(|e| ImmoError::Http {
            url: url.clone(),
            source: e,
        })?;
        let parsed: SearchResponse =
            serde_json::from_str(&raw).map_err(|e| ImmoError::MalformedResponse {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let ids = parsed
            .classifieds
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        Ok((ids, raw))
    }

    /// Fetches and persists one listing detail, unless already stored
    ///
    /// The cancellation token is checked before the fetch, not during it: an
    /// in-flight request is never interrupted, only the next one is skipped.
    async fn scrape_listing(&mut self, id: &str, cancel: &CancellationToken) -> Result<()> {
        if self.store.has_listing(&self.job.slug, id) {
            tracing::debug!(city = %self.job.slug, id, "listing already stored, skipping");
            return Ok(());
        }

        if cancel.is_cancelled() {
            return Err(ImmoError::Cancelled);
        }

        let url = self.platform.detail_url(id);
        let response = self.http.request(Method::GET, &url, None, None).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImmoError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let raw = response.text().await.map_err(|e| ImmoError::Http {
            url: url.clone(),
            source: e,
        })?;
        self.store.save_listing(&self.job.slug, id, &raw)?;
        tracing::debug!(city = %self.job.slug, id, "listing saved");
        Ok(())
    }
}
