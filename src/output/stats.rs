//! Per-city artifact statistics
//!
//! Counts are recomputed from disk on every call, so they stay correct while
//! a scrape runs in another process.

use crate::store::{ListingStore, StoreResult};

/// Artifact counts for one city directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityArtifacts {
    /// City slug (directory name)
    pub slug: String,

    /// Highest completed page number
    pub last_page: u32,

    /// Number of persisted listing documents
    pub listings: usize,
}

/// Scans the store and returns artifact counts for every city
pub fn scan_store(store: &ListingStore) -> StoreResult<Vec<CityArtifacts>> {
    let mut rows = Vec::new();

    for slug in store.city_slugs()? {
        rows.push(CityArtifacts {
            last_page: store.last_saved_page(&slug)?,
            listings: store.count_listings(&slug)?,
            slug,
        });
    }

    Ok(rows)
}

/// Prints the artifact summary as a small table
pub fn print_store_summary(rows: &[CityArtifacts]) {
    if rows.is_empty() {
        println!("No scraped cities yet");
        return;
    }

    println!("{:<24} {:>10} {:>10}", "City", "Pages", "Listings");
    for row in rows {
        println!(
            "{:<24} {:>10} {:>10}",
            row.slug, row.last_page, row.listings
        );
    }

    let total: usize = rows.iter().map(|r| r.listings).sum();
    println!("\nTotal listings: {}", total);
}
