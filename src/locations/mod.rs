//! Location resolution
//!
//! City names typed by the user are resolved into the platform's opaque
//! place identifiers via its autocomplete endpoint. The first suggestion
//! wins; its id seeds the search criteria and its label names the city job.

use crate::http::HttpClient;
use crate::scraper::Platform;
use crate::{ImmoError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Place types the autocomplete is restricted to (cities and districts)
const PLACE_TYPES: &[&str] = &[
    "NBH1", "NBH3", "AD09", "NBH2", "AD08", "AD06", "AD04", "POCO", "AD02",
];

/// Autocomplete request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteRequest {
    text: String,
    limit: u32,
    place_types: Vec<String>,
    parent_types: Vec<String>,
    locale: String,
}

impl AutocompleteRequest {
    fn for_city(text: &str) -> Self {
        let types: Vec<String> = PLACE_TYPES.iter().map(|t| t.to_string()).collect();
        Self {
            text: text.to_string(),
            limit: 10,
            place_types: types.clone(),
            parent_types: types,
            locale: "fr".to_string(),
        }
    }
}

/// One autocomplete suggestion, reduced to what we consume
#[derive(Debug, Deserialize)]
struct Suggestion {
    id: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
}

/// A resolved location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMatch {
    /// Opaque place identifier for search criteria
    pub id: String,

    /// Display label, falls back to the query text when absent
    pub label: String,
}

/// Resolves a city name against the autocomplete endpoint
///
/// Returns `None` when the platform has no suggestion with an id for the
/// query.
pub async fn location_autocomplete(
    http: &mut HttpClient,
    platform: &Platform,
    text: &str,
) -> Result<Option<LocationMatch>> {
    let url = platform.autocomplete_url();
    let referer = platform.root_referer();
    let payload = serde_json::to_string(&AutocompleteRequest::for_city(text))?;

    let response = http
        .request(Method::POST, &url, Some(payload), Some(&referer))
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImmoError::UnexpectedStatus {
            url,
            status: status.as_u16(),
        });
    }

    let raw = response.text().await.map_err(|e| ImmoError::Http {
        url: url.clone(),
        source: e,
    })?;
    let suggestions: Vec<Suggestion> =
        serde_json::from_str(&raw).map_err(|e| ImmoError::MalformedResponse {
            url: url.clone(),
            message: e.to_string(),
        })?;

    let resolved = suggestions.into_iter().find_map(|s| {
        let id = s.id?;
        let label = s
            .labels
            .into_iter()
            .next()
            .unwrap_or_else(|| text.to_string());
        Some(LocationMatch { id, label })
    });

    if let Some(found) = &resolved {
        tracing::info!(query = text, id = %found.id, label = %found.label, "location resolved");
    } else {
        tracing::warn!(query = text, "no location suggestion returned");
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = AutocompleteRequest::for_city("Lyon");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["text"], "Lyon");
        assert_eq!(value["limit"], 10);
        assert_eq!(value["locale"], "fr");
        assert_eq!(value["placeTypes"][0], "NBH1");
        assert_eq!(value["parentTypes"], value["placeTypes"]);
    }

    #[test]
    fn test_suggestions_parse_without_labels() {
        let raw = r#"[{"id": "AD08", "type": "city"}, {"labels": ["x"]}]"#;
        let suggestions: Vec<Suggestion> = serde_json::from_str(raw).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].id.as_deref(), Some("AD08"));
        assert!(suggestions[0].labels.is_empty());
        assert!(suggestions[1].id.is_none());
    }
}
