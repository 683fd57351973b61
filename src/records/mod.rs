//! Record extraction from stored listing documents
//!
//! Raw listing artifacts are deeply nested JSON documents. This module
//! flattens them into typed records along the consumer contract: dotted key
//! paths for scalar fields, and the `sections.hardFacts.facts` list of
//! `{type, value}` pairs pivoted into columns. A document that cannot be
//! extracted is logged and skipped; one bad file never aborts a batch.

mod extract;

pub use extract::{deep_get, parse_number, ExtractError, ListingRecord};

use crate::store::ListingStore;
use crate::Result;

/// Loads all extractable records for one city
///
/// Unreadable or malformed documents are skipped with a warning carrying the
/// offending path.
pub fn load_city_records(store: &ListingStore, slug: &str) -> Result<Vec<ListingRecord>> {
    let mut records = Vec::new();

    for path in store.listing_paths(slug)? {
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable listing, skipping");
                continue;
            }
        };

        let document: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid JSON, skipping");
                continue;
            }
        };

        match ListingRecord::from_document(&document) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unextractable listing, skipping");
            }
        }
    }

    tracing::info!(city = slug, records = records.len(), "records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bad_documents_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let store = ListingStore::new(dir.path());

        store
            .save_listing(
                "lyon",
                "1",
                r#"{"id": 1, "sections": {"hardFacts": {"price": {"value": 900}}}}"#,
            )
            .unwrap();
        store.save_listing("lyon", "2", "not json at all").unwrap();
        store.save_listing("lyon", "3", r#"{"noId": true}"#).unwrap();

        let records = load_city_records(&store, "lyon").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn test_missing_city_yields_empty_batch() {
        let dir = TempDir::new().unwrap();
        let store = ListingStore::new(dir.path());
        assert!(load_city_records(&store, "ghost").unwrap().is_empty());
    }
}
