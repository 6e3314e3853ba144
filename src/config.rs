//! Configuration management for the `HazardWatch` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::HazardWatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `HazardWatch` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HazardWatchConfig {
    /// API client configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// External endpoint base URLs
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Periodic refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// API client configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Weather API key (the weather endpoint is the only call requiring one)
    pub weather_api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request (Nominatim and NOAA require one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// External endpoint base URLs; overridable for testing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL for the weather one-call API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Base URL for the geocoding search API
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,
    /// Full URL for the daily earthquake GeoJSON feed
    #[serde(default = "default_seismic_feed_url")]
    pub seismic_feed_url: String,
    /// Base URL for the weather alerts API
    #[serde(default = "default_alerts_base_url")]
    pub alerts_base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Periodic refresh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Minutes between automatic refreshes in watch mode
    #[serde(default = "default_refresh_minutes")]
    pub interval_minutes: u32,
}

// Default value functions
fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("hazardwatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_geocode_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_seismic_feed_url() -> String {
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson".to_string()
}

fn default_alerts_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_refresh_minutes() -> u32 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            weather_base_url: default_weather_base_url(),
            geocode_base_url: default_geocode_base_url(),
            seismic_feed_url: default_seismic_feed_url(),
            alerts_base_url: default_alerts_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_refresh_minutes(),
        }
    }
}

impl HazardWatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config/default.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with HAZARDWATCH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("HAZARDWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: HazardWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hazardwatch").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(
                HazardWatchError::config("API timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.refresh.interval_minutes == 0 || self.refresh.interval_minutes > 1440 {
            return Err(HazardWatchError::config(
                "Refresh interval must be between 1 and 1440 minutes",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(HazardWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for url in [
            &self.endpoints.weather_base_url,
            &self.endpoints.geocode_base_url,
            &self.endpoints.seismic_feed_url,
            &self.endpoints.alerts_base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HazardWatchError::config(format!(
                    "Endpoint '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(api_key) = &self.api.weather_api_key {
            if api_key.is_empty() {
                return Err(HazardWatchError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }
}
