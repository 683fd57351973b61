use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub platform: PlatformConfig,
    pub http: HttpConfig,
    pub credentials: CredentialConfig,
    pub scrape: ScrapeConfig,
}

/// Target platform configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform; tests point this at a mock server
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// HTTP client behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Lower bound of the random inter-request delay (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the random inter-request delay (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Total attempts per request, including the first one
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Fixed sleep between attempts after a transient network error (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Session credential configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// Cookie file written by the refresh command
    #[serde(rename = "cookie-path")]
    pub cookie_path: String,

    /// Argv vector of the external command minting the cookie file
    #[serde(rename = "refresh-command")]
    pub refresh_command: Vec<String>,
}

/// Scrape run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Listings requested per search page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Safety cap on page numbers per city
    #[serde(rename = "max-page")]
    pub max_page: u32,

    /// Root directory of the artifact store
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Flag file whose presence requests a cooperative stop
    #[serde(rename = "stop-flag", default = "default_stop_flag")]
    pub stop_flag: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_stop_flag() -> String {
    "stop_scraping.flag".to_string()
}
