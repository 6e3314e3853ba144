//! Recent earthquakes near a location, from the daily USGS GeoJSON feed
//!
//! The whole-planet feed is filtered down to events within a coarse
//! coordinate radius of the location. The feed is an enhancement source, so
//! any failure degrades to an empty list rather than an error.

use crate::client::ApiClient;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Coordinate-space radius (degrees) within which events are considered nearby
pub const NEARBY_RADIUS_DEG: f64 = 5.0;

/// One earthquake near the assessed location
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicEvent {
    /// Moment magnitude
    pub magnitude: f64,
    /// Human-readable epicenter description
    pub place: String,
    /// Origin time
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Hypocenter depth in kilometers
    pub depth_km: f64,
}

impl SeismicEvent {
    /// Whether the event occurred within the given number of days before `now`
    #[must_use]
    pub fn within_days(&self, now: DateTime<Utc>, days: i64) -> bool {
        now.signed_duration_since(self.time) <= chrono::Duration::days(days)
    }
}

/// Fetch earthquakes near a coordinate pair.
///
/// Returns an empty list on any failure.
#[instrument(skip(client))]
pub async fn fetch_nearby(client: &ApiClient, lat: f64, lon: f64) -> Vec<SeismicEvent> {
    match fetch_feed(client).await {
        Ok(collection) => {
            let events = filter_nearby(collection, lat, lon);
            debug!("Found {} nearby seismic events", events.len());
            events
        }
        Err(e) => {
            warn!("Seismic feed unavailable: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_feed(client: &ApiClient) -> anyhow::Result<FeatureCollection> {
    let url = client.seismic_url();
    client.get_json(&url).await
}

fn filter_nearby(collection: FeatureCollection, lat: f64, lon: f64) -> Vec<SeismicEvent> {
    collection
        .features
        .into_iter()
        .filter_map(SeismicEvent::try_from_feature)
        .filter(|event| {
            coordinate_distance(lat, lon, event.latitude, event.longitude) < NEARBY_RADIUS_DEG
        })
        .collect()
}

/// Straight-line distance in coordinate space, in degrees.
///
/// Not a geodesic distance. A fixed degree radius is intentionally coarse;
/// it widens toward the poles and that is acceptable for proximity screening.
#[must_use]
pub fn coordinate_distance(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    ((lat_a - lat_b).powi(2) + (lon_a - lon_b).powi(2)).sqrt()
}

/// GeoJSON feed structures
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
    geometry: FeatureGeometry,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    mag: Option<f64>,
    place: Option<String>,
    /// Milliseconds since the Unix epoch
    time: i64,
}

#[derive(Debug, Deserialize)]
struct FeatureGeometry {
    /// [longitude, latitude, depth_km]
    coordinates: Vec<f64>,
}

impl SeismicEvent {
    /// Convert a feed feature, dropping entries without magnitude or a
    /// complete coordinate triple
    fn try_from_feature(feature: Feature) -> Option<Self> {
        let magnitude = feature.properties.mag?;
        let time = Utc.timestamp_millis_opt(feature.properties.time).single()?;
        let [lon, lat, depth] = feature.geometry.coordinates[..] else {
            return None;
        };

        Some(SeismicEvent {
            magnitude,
            place: feature
                .properties
                .place
                .unwrap_or_else(|| "Unknown location".to_string()),
            time,
            latitude: lat,
            longitude: lon,
            depth_km: depth,
        })
    }
}
