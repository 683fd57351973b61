//! HTTP layer for the scraper
//!
//! This module wraps a reqwest session with:
//! - the fixed browser-like header set the platform expects
//! - the session credential attached on every attempt
//! - retry-with-credential-refresh on 403
//! - retry-with-backoff on timeouts and connection errors
//! - a uniform-random inter-request delay on the success path

mod client;
mod headers;

pub use client::HttpClient;
pub use headers::base_headers;
