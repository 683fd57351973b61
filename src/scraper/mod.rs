//! Scraping core
//!
//! This module contains the pagination controller:
//! - search payload and response types for the platform API
//! - the per-city page scraper (fetch page, fetch listings, checkpoint)
//! - the multi-city orchestrator that round-robins cities page by page

mod city_scraper;
mod orchestrator;
mod search;

pub use city_scraper::CityScraper;
pub use orchestrator::{run_scraping, run_scraping_with_refresher, CityStats};
pub use search::{
    Classified, ClassifiedId, LocationFilter, Paging, SearchCriteria, SearchRequest, SearchResponse,
};

/// Endpoint set of the target platform
///
/// Routes are fixed; the base URL is configurable so the test suite can point
/// the scraper at a mock server.
#[derive(Debug, Clone)]
pub struct Platform {
    base: String,
}

impl Platform {
    /// Creates a platform rooted at `base_url` (trailing slash tolerated)
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL, used as the `Origin` header value
    pub fn origin(&self) -> &str {
        &self.base
    }

    /// Paginated search endpoint (POST)
    pub fn search_url(&self) -> String {
        format!("{}/serp-bff/search", self.base)
    }

    /// Listing detail endpoint for one id (GET)
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/cdp-bff/v1/classified/{}", self.base, id)
    }

    /// Location autocomplete endpoint (POST)
    pub fn autocomplete_url(&self) -> String {
        format!("{}/search-mfe-bff/autocomplete", self.base)
    }

    /// Referer presented with search requests, mirroring the browser flow
    pub fn search_referer(&self, location_id: &str) -> String {
        format!(
            "{}/classified-search?distributionTypes=Rent&estateTypes=House,Apartment&locations={}&order=Default",
            self.base, location_id
        )
    }

    /// Referer presented with autocomplete requests
    pub fn root_referer(&self) -> String {
        format!("{}/", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_urls() {
        let platform = Platform::new("https://www.example.com/");
        assert_eq!(platform.origin(), "https://www.example.com");
        assert_eq!(
            platform.search_url(),
            "https://www.example.com/serp-bff/search"
        );
        assert_eq!(
            platform.detail_url("123"),
            "https://www.example.com/cdp-bff/v1/classified/123"
        );
        assert!(platform.search_referer("AD08").contains("locations=AD08"));
    }
}
