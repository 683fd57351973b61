//! Output and reporting
//!
//! Everything shown to the user is derived from the filesystem store, never
//! from scraper memory: the dashboard polls artifact counts the same way.

mod stats;

pub use stats::{print_store_summary, scan_store, CityArtifacts};
