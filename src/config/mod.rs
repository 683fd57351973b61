//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use immoduel::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Page size: {}", config.scrape.page_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CredentialConfig, HttpConfig, PlatformConfig, ScrapeConfig};

// Re-export parser functions
pub use parser::load_config;
