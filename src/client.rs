//! Shared HTTP client for all external feeds
//!
//! Builds a single `reqwest` client from configuration and centralizes
//! endpoint URL construction so tests can redirect every feed.

use crate::HazardWatchError;
use crate::config::HazardWatchConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client with configured endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: HazardWatchConfig,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: HazardWatchConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds.into());

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.api.user_agent.clone())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    /// The configuration backing this client
    #[must_use]
    pub fn config(&self) -> &HazardWatchConfig {
        &self.config
    }

    /// One-call weather endpoint for a coordinate pair
    #[must_use]
    pub fn weather_url(&self, lat: f64, lon: f64) -> String {
        let key = self
            .config
            .api
            .weather_api_key
            .as_deref()
            .unwrap_or_default();
        format!(
            "{}/data/3.0/onecall?lat={lat}&lon={lon}&appid={key}&units=metric",
            self.config.endpoints.weather_base_url
        )
    }

    /// Address-search endpoint for a free-text query
    #[must_use]
    pub fn geocode_url(&self, query: &str) -> String {
        format!(
            "{}/search?format=json&q={}&limit=5&addressdetails=1",
            self.config.endpoints.geocode_base_url,
            urlencoding::encode(query)
        )
    }

    /// Daily earthquake feed URL
    #[must_use]
    pub fn seismic_url(&self) -> String {
        self.config.endpoints.seismic_feed_url.clone()
    }

    /// Alerts-by-point endpoint for a coordinate pair
    #[must_use]
    pub fn alerts_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/alerts?point={lat},{lon}",
            self.config.endpoints.alerts_base_url
        )
    }

    /// Issue a GET request and decode the JSON body.
    ///
    /// Network failures and non-success statuses surface as `Api` errors,
    /// unparseable bodies as `Decode` errors. Callers decide whether to
    /// propagate or fall back.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| HazardWatchError::api(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HazardWatchError::api(format!(
                "Request returned status {status}"
            ))
            .into());
        }

        let payload = response
            .json::<T>()
            .await
            .map_err(|e| HazardWatchError::decode(format!("Unrecognized payload: {e}")))?;

        Ok(payload)
    }
}
