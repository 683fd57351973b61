//! Session credential management
//!
//! The target platform authorizes requests with a cookie set minted by an
//! interactive browser session. This module owns the lifecycle of that
//! credential: loading it from the cookie file, caching it, invalidating the
//! cache when the server signals expiry, and delegating reacquisition to a
//! pluggable refresh capability.

mod provider;
mod refresh;

pub use provider::CredentialProvider;
pub use refresh::{CommandRefresher, CredentialRefresh};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while acquiring a session credential
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential file was not produced: {0}")]
    Unavailable(PathBuf),

    #[error("Credential refresh failed: {0}")]
    Refresh(String),

    #[error("Failed to read credential file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credential file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for credential operations
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;
