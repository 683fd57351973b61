//! Filesystem-backed artifact store
//!
//! Raw platform responses are persisted as-is under one directory per city:
//! search pages under `pages/`, listing details under `annonces/`. The store
//! is the only durable state of a scrape run; the resume point of every city
//! is re-derived from the highest page number on disk.

mod fs;

pub use fs::ListingStore;

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
