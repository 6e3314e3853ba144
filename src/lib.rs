//! `HazardWatch` - multi-source natural hazard risk assessment
//!
//! This library provides the core pipeline for a hazard risk dashboard:
//! geocoding, weather retrieval with synthetic fallback, seismic and alert
//! feeds, synthetic historical statistics, and heuristic per-hazard scoring.

pub mod alerts;
pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod geocode;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod seismic;
pub mod weather;

// Re-export core types for public API
pub use app::{AppModel, Cmd, Msg, Phase, SearchState};
pub use client::ApiClient;
pub use config::HazardWatchConfig;
pub use error::HazardWatchError;
pub use models::{
    ConfidenceSet, CurrentConditions, DataSource, ForecastPoint, Hazard, HazardRiskSet,
    HistoricalSummary, Location,
};
pub use pipeline::RiskReport;
pub use risk::RiskLabel;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HazardWatchError>;
