//! Location search via the Nominatim address-search API
//!
//! Queries shorter than three characters never reach the network. Any
//! failure falls back to a static list of well-known cities filtered by the
//! query, so callers always get a (possibly empty) list and never an error.

use crate::client::ApiClient;
use crate::models::Location;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Minimum query length before a search is issued
pub const MIN_QUERY_LEN: usize = 3;

/// Maximum number of results returned
const MAX_RESULTS: usize = 5;

/// Search for locations matching a free-text query.
///
/// Returns at most five candidates ranked by the service. Never errors: on
/// any failure the static fallback list is filtered instead.
#[instrument(skip(client))]
pub async fn search(client: &ApiClient, query: &str) -> Vec<Location> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    match search_remote(client, query).await {
        Ok(results) => {
            debug!("Found {} geocoding results for '{}'", results.len(), query);
            results
        }
        Err(e) => {
            warn!("Geocoding failed for '{}': {}, using fallback list", query, e);
            fallback_locations(query)
        }
    }
}

async fn search_remote(client: &ApiClient, query: &str) -> anyhow::Result<Vec<Location>> {
    let url = client.geocode_url(query);
    let results: Vec<SearchResult> = client.get_json(&url).await?;

    Ok(results
        .into_iter()
        .filter_map(Location::try_from_search)
        .take(MAX_RESULTS)
        .collect())
}

/// A single result from the address-search service
#[derive(Debug, Deserialize)]
struct SearchResult {
    display_name: String,
    /// Latitude as a decimal string
    lat: String,
    /// Longitude as a decimal string
    lon: String,
    address: Option<SearchAddress>,
    importance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchAddress {
    country: Option<String>,
}

impl Location {
    /// Convert a search result, dropping entries with unparseable coordinates
    fn try_from_search(result: SearchResult) -> Option<Self> {
        let latitude: f64 = result.lat.parse().ok()?;
        let longitude: f64 = result.lon.parse().ok()?;

        // Keep only the first two comma-separated segments of the full
        // display name, e.g. "Tokyo, Japan" out of a long address chain.
        let name = result
            .display_name
            .split(',')
            .take(2)
            .collect::<Vec<_>>()
            .join(",");

        let country = result
            .address
            .and_then(|a| a.country)
            .unwrap_or_else(|| "Unknown".to_string());

        Some(Location {
            name,
            latitude,
            longitude,
            country,
            importance: result.importance,
        })
    }
}

/// Well-known cities used when the search service is unavailable
fn fallback_city_list() -> Vec<Location> {
    vec![
        Location::with_country("New York, NY", 40.7128, -74.0060, "USA"),
        Location::with_country("Los Angeles, CA", 34.0522, -118.2437, "USA"),
        Location::with_country("Chicago, IL", 41.8781, -87.6298, "USA"),
        Location::with_country("Miami, FL", 25.7617, -80.1918, "USA"),
        Location::with_country("Houston, TX", 29.7604, -95.3698, "USA"),
        Location::with_country("Phoenix, AZ", 33.4484, -112.0740, "USA"),
        Location::with_country("Denver, CO", 39.7392, -104.9903, "USA"),
        Location::with_country("Seattle, WA", 47.6062, -122.3321, "USA"),
        Location::with_country("Tokyo, Japan", 35.6762, 139.6503, "Japan"),
        Location::with_country("London, UK", 51.5074, -0.1278, "UK"),
        Location::with_country("Sydney, Australia", -33.8688, 151.2093, "Australia"),
        Location::with_country("San Francisco, CA", 37.7749, -122.4194, "USA"),
    ]
}

/// Filter the static city list by a case-insensitive substring match
#[must_use]
pub fn fallback_locations(query: &str) -> Vec<Location> {
    let needle = query.to_lowercase();
    fallback_city_list()
        .into_iter()
        .filter(|loc| loc.name.to_lowercase().contains(&needle))
        .take(MAX_RESULTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tokyo", "Tokyo, Japan")]
    #[case("SAN FR", "San Francisco, CA")]
    #[case("york", "New York, NY")]
    fn test_fallback_filter_is_case_insensitive(#[case] query: &str, #[case] expected: &str) {
        let results = fallback_locations(query);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, expected);
    }

    #[test]
    fn test_fallback_caps_results() {
        // Every city name contains a comma
        let results = fallback_locations(",");
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_fallback_no_match_is_empty() {
        assert!(fallback_locations("atlantis").is_empty());
    }

    #[test]
    fn test_search_result_name_truncation() {
        let result = SearchResult {
            display_name: "Tokyo, Japan, Kanto, Honshu".to_string(),
            lat: "35.6762".to_string(),
            lon: "139.6503".to_string(),
            address: Some(SearchAddress {
                country: Some("Japan".to_string()),
            }),
            importance: Some(0.9),
        };

        let location = Location::try_from_search(result).unwrap();
        assert_eq!(location.name, "Tokyo, Japan");
        assert_eq!(location.country, "Japan");
        assert_eq!(location.importance, Some(0.9));
    }

    #[test]
    fn test_search_result_bad_coordinates_dropped() {
        let result = SearchResult {
            display_name: "Nowhere".to_string(),
            lat: "not-a-number".to_string(),
            lon: "0.0".to_string(),
            address: None,
            importance: None,
        };

        assert!(Location::try_from_search(result).is_none());
    }

    #[tokio::test]
    async fn test_short_query_returns_empty_without_network() {
        // The endpoint is unroutable; a short query must not even try it.
        let mut config = crate::HazardWatchConfig::default();
        config.endpoints.geocode_base_url = "http://127.0.0.1:9".to_string();
        let client = ApiClient::new(config).unwrap();

        assert!(search(&client, "ab").await.is_empty());
        assert!(search(&client, "  a ").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_uses_fallback() {
        let mut config = crate::HazardWatchConfig::default();
        config.endpoints.geocode_base_url = "http://127.0.0.1:9".to_string();
        let client = ApiClient::new(config).unwrap();

        let results = search(&client, "tokyo").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Tokyo, Japan");
    }
}
