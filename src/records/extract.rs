use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while extracting a record from one document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document has no usable id")]
    MissingId,
}

/// Flat, typed view of one listing document
///
/// Scalar fields come from fixed dotted key paths; everything under
/// `sections.hardFacts.facts` is pivoted into the `facts` map, with the
/// well-known numeric facts also promoted to typed columns.
#[derive(Debug, Clone, Serialize)]
pub struct ListingRecord {
    pub id: String,
    pub brand: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub title: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub update_date: Option<DateTime<Utc>>,
    pub price_value: Option<f64>,
    pub living_space: Option<f64>,
    pub number_of_rooms: Option<f64>,
    pub price_per_m2: Option<f64>,
    /// Longitude of the listing's point geometry, when present
    pub lon: Option<f64>,
    /// Latitude of the listing's point geometry, when present
    pub lat: Option<f64>,
    /// All `{type, value}` facts pivoted into columns
    pub facts: BTreeMap<String, String>,
}

impl ListingRecord {
    /// Extracts a record from a raw listing document
    pub fn from_document(document: &Value) -> Result<Self, ExtractError> {
        let id = document
            .get("id")
            .and_then(value_to_string)
            .ok_or(ExtractError::MissingId)?;

        let facts = pivot_facts(document);
        let price_value =
            deep_get(document, "sections.hardFacts.price.value").and_then(value_to_number);
        let living_space = facts.get("livingSpace").and_then(|v| parse_number(v));
        let number_of_rooms = facts.get("numberOfRooms").and_then(|v| parse_number(v));

        let price_per_m2 = match (price_value, living_space) {
            (Some(price), Some(space)) if space > 0.0 => Some((price / space).round()),
            _ => None,
        };

        let (lon, lat) = point_coordinates(document);

        Ok(Self {
            id,
            brand: document.get("brand").and_then(value_to_string),
            city: deep_get(document, "sections.location.address.city").and_then(value_to_string),
            zip_code: deep_get(document, "sections.location.address.zipCode")
                .and_then(value_to_string),
            country: deep_get(document, "sections.location.address.country")
                .and_then(value_to_string),
            title: deep_get(document, "sections.hardFacts.title").and_then(value_to_string),
            headline: deep_get(document, "sections.description.headline")
                .and_then(value_to_string),
            description: deep_get(document, "sections.description.description")
                .and_then(value_to_string),
            creation_date: deep_get(document, "metadata.creationDate")
                .and_then(value_to_string)
                .as_deref()
                .and_then(parse_timestamp),
            update_date: deep_get(document, "metadata.updateDate")
                .and_then(value_to_string)
                .as_deref()
                .and_then(parse_timestamp),
            price_value,
            living_space,
            number_of_rooms,
            price_per_m2,
            lon,
            lat,
            facts,
        })
    }
}

/// Resolves a dotted key path (`"a.b.c"`) inside a JSON document
pub fn deep_get<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for key in path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Parses a localized numeric string, e.g. `"1 234,56 m²"` → `1234.56`
///
/// Everything except digits, commas and dots is stripped; the decimal comma
/// becomes a dot. Strings without any digit yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned == "." {
        return None;
    }
    cleaned.parse().ok()
}

/// Pivots the `sections.hardFacts.facts` list into a `type -> value` map
fn pivot_facts(document: &Value) -> BTreeMap<String, String> {
    let mut pivoted = BTreeMap::new();

    if let Some(facts) = deep_get(document, "sections.hardFacts.facts").and_then(Value::as_array) {
        for fact in facts {
            let fact_type = fact.get("type").and_then(value_to_string);
            let fact_value = fact.get("value").and_then(value_to_string);
            if let (Some(fact_type), Some(fact_value)) = (fact_type, fact_value) {
                pivoted.insert(fact_type, fact_value);
            }
        }
    }

    pivoted
}

/// Longitude/latitude of a `Point` geometry, `(None, None)` otherwise
fn point_coordinates(document: &Value) -> (Option<f64>, Option<f64>) {
    let geometry_type = deep_get(document, "sections.location.geometry.type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if geometry_type != "Point" {
        return (None, None);
    }

    let coords = deep_get(document, "sections.location.geometry.coordinates")
        .and_then(Value::as_array);
    match coords {
        Some(pair) if pair.len() >= 2 => (pair[0].as_f64(), pair[1].as_f64()),
        _ => (None, None),
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parses the platform's timestamp formats into UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
