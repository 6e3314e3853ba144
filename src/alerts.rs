//! Active weather alerts for a coordinate pair
//!
//! Queries the alerts-by-point API. US-only coverage; locations outside it
//! return HTTP errors, which degrade to an empty list like every other
//! enhancement feed.

use crate::client::ApiClient;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// One active alert covering the assessed location
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherAlert {
    /// Event name, e.g. "Tornado Warning"
    pub event: String,
    /// One-line summary of the alert
    pub headline: String,
    /// Severity as reported, e.g. "Severe", "Moderate"
    pub severity: String,
    /// Affected areas description
    pub area: String,
}

/// Fetch active alerts for a coordinate pair.
///
/// Returns an empty list on any failure.
#[instrument(skip(client))]
pub async fn fetch_active(client: &ApiClient, lat: f64, lon: f64) -> Vec<WeatherAlert> {
    let url = client.alerts_url(lat, lon);
    match client.get_json::<AlertCollection>(&url).await {
        Ok(collection) => {
            let alerts: Vec<WeatherAlert> = collection
                .features
                .into_iter()
                .map(WeatherAlert::from_feature)
                .collect();
            debug!("Found {} active alerts", alerts.len());
            alerts
        }
        Err(e) => {
            warn!("Alerts feed unavailable: {}", e);
            Vec::new()
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlertCollection {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
struct AlertProperties {
    event: Option<String>,
    headline: Option<String>,
    severity: Option<String>,
    #[serde(rename = "areaDesc")]
    area_desc: Option<String>,
}

impl WeatherAlert {
    fn from_feature(feature: AlertFeature) -> Self {
        let p = feature.properties;
        Self {
            event: p.event.unwrap_or_else(|| "Weather Alert".to_string()),
            headline: p.headline.unwrap_or_default(),
            severity: p.severity.unwrap_or_else(|| "Unknown".to_string()),
            area: p.area_desc.unwrap_or_default(),
        }
    }
}
