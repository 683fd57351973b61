//! Immoduel: a throttled real-estate listings scraper
//!
//! This crate walks a paginated real-estate search API for French cities,
//! persists the raw per-page and per-listing JSON responses idempotently on
//! the filesystem, and extracts typed records from the stored documents so
//! that two cities can be compared side by side.

pub mod cancel;
pub mod city;
pub mod config;
pub mod credentials;
pub mod http;
pub mod locations;
pub mod output;
pub mod records;
pub mod scraper;
pub mod store;

use thiserror::Error;

/// Main error type for immoduel operations
#[derive(Debug, Error)]
pub enum ImmoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credential error: {0}")]
    Credential(#[from] credentials::CredentialError),

    #[error("Session rejected (403) for {url} despite credential refresh")]
    AuthExpired { url: String },

    #[error("Network failure for {url} after {attempts} attempts: {source}")]
    NetworkExhausted {
        url: String,
        attempts: u32,
        source: reqwest::Error,
    },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Malformed response for {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Scrape cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for immoduel operations
pub type Result<T> = std::result::Result<T, ImmoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use city::{normalize_city, CityJob};
pub use config::Config;
pub use scraper::{run_scraping, CityStats};
