//! Data models for locations, weather conditions and hazard risk scores
//!
//! This module contains the data structures shared by the fetch pipeline and
//! the risk estimator. All risk and confidence values are clamped to [0, 100].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved geographic location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Location name (city, region, etc.)
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name
    pub country: String,
    /// Relevance score from the geocoder, when available
    pub importance: Option<f64>,
}

impl Location {
    /// Create a new location
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: "Unknown".to_string(),
            importance: None,
        }
    }

    /// Create location with country
    pub fn with_country(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: country.into(),
            importance: None,
        }
    }

    /// The default location shown before any search
    #[must_use]
    pub fn default_city() -> Self {
        Self::with_country("New York, NY", 40.7128, -74.0060, "USA")
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current weather conditions, normalized to metric units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: f64,
    /// Precipitation over the last hour in mm
    pub precipitation: f64,
    /// Visibility in kilometers
    pub visibility: f64,
    /// UV index (0-11)
    pub uv_index: f64,
}

/// A single hour of forecast data
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Hour offset from now (0-23)
    pub hour: u8,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Cloud cover percentage (0-100)
    pub clouds: f64,
    /// UV index (0-11)
    pub uv_index: f64,
}

/// Hazard types tracked by the dashboard
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hazard {
    Tornado,
    Flood,
    Wildfire,
    Hurricane,
    Earthquake,
    Blizzard,
}

impl Hazard {
    /// All hazard types, in display order
    pub const ALL: [Hazard; 6] = [
        Hazard::Tornado,
        Hazard::Flood,
        Hazard::Wildfire,
        Hazard::Hurricane,
        Hazard::Earthquake,
        Hazard::Blizzard,
    ];

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Hazard::Tornado => "Tornado",
            Hazard::Flood => "Flood",
            Hazard::Wildfire => "Wildfire",
            Hazard::Hurricane => "Hurricane",
            Hazard::Earthquake => "Earthquake",
            Hazard::Blizzard => "Blizzard",
        }
    }
}

impl std::fmt::Display for Hazard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Synthetic historical statistics for one hazard at one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoricalSummary {
    /// Number of recorded events
    pub historical_count: u32,
    /// Average event severity on the hazard's own scale
    pub average_severity: f64,
    /// Heuristic risk score (0-100)
    pub risk_score: f64,
    /// Timestamp of the last major event, when one is synthesized
    pub last_major_event: Option<DateTime<Utc>>,
}

/// Per-hazard risk scores, recomputed atomically for a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct HazardRiskSet {
    scores: BTreeMap<Hazard, f64>,
}

impl HazardRiskSet {
    /// Build a risk set from per-hazard scores, clamping each to [0, 100]
    #[must_use]
    pub fn from_scores(scores: impl IntoIterator<Item = (Hazard, f64)>) -> Self {
        Self {
            scores: scores
                .into_iter()
                .map(|(hazard, score)| (hazard, score.clamp(0.0, 100.0)))
                .collect(),
        }
    }

    /// Risk score for one hazard (0 when absent)
    #[must_use]
    pub fn get(&self, hazard: Hazard) -> f64 {
        self.scores.get(&hazard).copied().unwrap_or(0.0)
    }

    /// Number of hazards with a score
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no scores are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate over (hazard, score) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Hazard, f64)> + '_ {
        Hazard::ALL.iter().map(|&hazard| (hazard, self.get(hazard)))
    }

    /// Highest score across all hazards
    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.scores.values().copied().fold(0.0, f64::max)
    }
}

/// Per-hazard confidence percentages plus an overall figure.
///
/// These are a constant baseline plus bounded jitter, not a function of data
/// quality. Kept that way deliberately.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfidenceSet {
    per_hazard: BTreeMap<Hazard, f64>,
    /// Average across hazards
    pub overall: f64,
}

impl ConfidenceSet {
    /// Build a confidence set, clamping every value to [0, 100]
    #[must_use]
    pub fn from_values(per_hazard: impl IntoIterator<Item = (Hazard, f64)>, overall: f64) -> Self {
        Self {
            per_hazard: per_hazard
                .into_iter()
                .map(|(hazard, value)| (hazard, value.clamp(0.0, 100.0)))
                .collect(),
            overall: overall.clamp(0.0, 100.0),
        }
    }

    /// Confidence for one hazard (0 when absent)
    #[must_use]
    pub fn get(&self, hazard: Hazard) -> f64 {
        self.per_hazard.get(&hazard).copied().unwrap_or(0.0)
    }
}

/// Whether displayed data came from a live call or a synthetic fallback
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// At least the weather data came from a live external call
    Live,
    /// All weather data was generated locally
    Simulated,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Live => write!(f, "Live Data"),
            DataSource::Simulated => write!(f, "Simulated"),
        }
    }
}
