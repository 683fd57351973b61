//! City identification for scrape jobs
//!
//! This module derives filesystem-safe slugs from human-readable city names
//! and bundles a city with the opaque location identifier the search API
//! expects.

mod job;
mod slug;

pub use job::CityJob;
pub use slug::normalize_city;
