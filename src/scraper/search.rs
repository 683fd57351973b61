//! Wire types for the paginated search endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Search request body
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub criteria: SearchCriteria,
    pub paging: Paging,
}

/// Listing filters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub distribution_types: Vec<String>,
    pub estate_types: Vec<String>,
    pub project_types: Vec<String>,
    pub location: LocationFilter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFilter {
    pub place_ids: Vec<String>,
}

/// Paging block of a search request
#[derive(Debug, Clone, Serialize)]
pub struct Paging {
    pub page: u32,
    pub size: u32,
    pub order: String,
}

impl SearchRequest {
    /// Standard rental search for one location
    ///
    /// Filters match the dashboard use case: rentals, houses and apartments,
    /// existing stock plus flatshares, default ordering.
    pub fn rentals(location_id: &str, page: u32, size: u32) -> Self {
        Self {
            criteria: SearchCriteria {
                distribution_types: vec!["Rent".to_string()],
                estate_types: vec!["House".to_string(), "Apartment".to_string()],
                project_types: vec!["Stock".to_string(), "Flatsharing".to_string()],
                location: LocationFilter {
                    place_ids: vec![location_id.to_string()],
                },
            },
            paging: Paging {
                page,
                size,
                order: "Default".to_string(),
            },
        }
    }
}

/// Search response body, reduced to what the scraper consumes
///
/// The raw body is persisted verbatim as the page artifact; this type only
/// extracts the listing ids.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub classifieds: Vec<Classified>,
}

/// One classified entry of a search response
#[derive(Debug, Deserialize)]
pub struct Classified {
    pub id: ClassifiedId,
}

/// Listing id as the platform serializes it
///
/// Observed as both a JSON number and a JSON string; normalized to a string
/// for filenames and detail URLs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClassifiedId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ClassifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifiedId::Number(n) => write!(f, "{}", n),
            ClassifiedId::Text(s) => write!(f, "{}", s),
        }
    }
}
