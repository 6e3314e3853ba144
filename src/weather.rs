//! Weather retrieval with synthetic fallback
//!
//! Attempts the one-call weather endpoint and, on any failure, synthesizes a
//! plausible dataset from geographic and seasonal patterns. The live response
//! is decoded through an explicit enum over the two recognized shapes;
//! anything else is a decode error and triggers the same fallback.

use crate::client::ApiClient;
use crate::models::{CurrentConditions, DataSource, ForecastPoint};
use chrono::{DateTime, Datelike, Timelike, Utc};
use rand::RngExt;
use std::f64::consts::PI;
use tracing::{debug, instrument, warn};

/// Number of hourly points in a forecast
pub const FORECAST_HOURS: usize = 24;

/// Current conditions plus a 24-hour forecast and their provenance
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
    pub source: DataSource,
}

/// Fetch the raw one-call payload for a coordinate pair.
///
/// Errors here (network, HTTP status, unrecognized shape) are expected to be
/// resolved by [`resolve`], which substitutes synthetic data.
#[instrument(skip(client))]
pub async fn fetch_payload(
    client: &ApiClient,
    lat: f64,
    lon: f64,
) -> anyhow::Result<openweather::Payload> {
    let url = client.weather_url(lat, lon);
    client.get_json(&url).await
}

/// Turn a fetch outcome into a complete weather bundle.
///
/// A live payload is normalized to metric display units; any failure yields
/// synthetic current conditions and forecast. The forecast is synthesized
/// even for a live payload when it carries no hourly data.
pub fn resolve(
    payload: anyhow::Result<openweather::Payload>,
    lat: f64,
    lon: f64,
    now: DateTime<Utc>,
    rng: &mut impl RngExt,
) -> WeatherBundle {
    match payload {
        Ok(payload) => {
            debug!("Using live weather data");
            let forecast = payload
                .hourly_forecast()
                .unwrap_or_else(|| simulate_forecast(lat, rng));
            let current = payload.into_current(rng);
            WeatherBundle {
                current,
                forecast,
                source: DataSource::Live,
            }
        }
        Err(e) => {
            warn!("Weather fetch failed: {}, generating synthetic data", e);
            WeatherBundle {
                current: simulate_current(lat, lon, now, rng),
                forecast: simulate_forecast(lat, rng),
                source: DataSource::Simulated,
            }
        }
    }
}

/// Fetch weather for a coordinate pair, falling back to synthetic data.
pub async fn fetch(
    client: &ApiClient,
    lat: f64,
    lon: f64,
    now: DateTime<Utc>,
    rng: &mut impl RngExt,
) -> WeatherBundle {
    let payload = fetch_payload(client, lat, lon).await;
    resolve(payload, lat, lon, now, rng)
}

/// Generate synthetic current conditions from geographic and seasonal
/// patterns: latitude-based base temperature, day-of-year seasonal phase,
/// diurnal swing, a coarse coastal-proximity humidity rule, and bounded noise.
pub fn simulate_current(
    lat: f64,
    lon: f64,
    now: DateTime<Utc>,
    rng: &mut impl RngExt,
) -> CurrentConditions {
    let day_of_year = f64::from(now.ordinal());
    let seasonal = (day_of_year / 365.0 * 2.0 * PI).sin();

    let base_temp = 15.0 + lat.to_radians().cos() * 20.0 + seasonal * 15.0;
    let diurnal = (f64::from(now.hour()) / 24.0 * 2.0 * PI).sin() * 8.0;
    let temperature = base_temp + diurnal + (rng.random_range(0.0..1.0) - 0.5) * 5.0;

    // Simplified coastal detection by longitude magnitude
    let coastal = if lon.abs() > 100.0 { 0.3 } else { 0.7 };
    let latitudinal_humidity = 80.0 - lat.abs() * 0.8;
    let humidity =
        (latitudinal_humidity * coastal + rng.random_range(0.0..20.0)).clamp(20.0, 95.0);

    let base_pressure = 1013.25 - lat.abs() * 0.1;
    let pressure = base_pressure + (rng.random_range(0.0..1.0) - 0.5) * 20.0;

    let wind_speed = if lat.abs() > 30.0 {
        15.0 + rng.random_range(0.0..25.0)
    } else {
        8.0 + rng.random_range(0.0..15.0)
    };

    let uv_index = ((11.0 - lat.abs() / 8.0) + rng.random_range(0.0..2.0)).clamp(0.0, 11.0);

    CurrentConditions {
        temperature: round1(temperature),
        humidity: humidity.round(),
        pressure: round1(pressure),
        wind_speed: round1(wind_speed),
        wind_direction: f64::from(rng.random_range(0..360)),
        precipitation: round1(rng.random_range(0.0..5.0)),
        visibility: round1(10.0 + rng.random_range(0.0..15.0)),
        uv_index: round1(uv_index),
    }
}

/// Generate a synthetic 24-hour forecast from hour-of-day sinusoids keyed by
/// latitude.
pub fn simulate_forecast(lat: f64, rng: &mut impl RngExt) -> Vec<ForecastPoint> {
    let base_temp = 15.0 + lat.to_radians().cos() * 20.0;

    (0..FORECAST_HOURS)
        .map(|hour| {
            let h = hour as f64;
            let daylight = if (6..=18).contains(&hour) {
                ((h - 6.0) / 12.0 * PI).sin()
            } else {
                0.0
            };
            let uv_peak = (11.0 - lat.abs() / 8.0).max(0.0);

            ForecastPoint {
                hour: hour as u8,
                temperature: round1(
                    base_temp + (h / 4.0).sin() * 8.0 + (rng.random_range(0.0..1.0) - 0.5) * 3.0,
                ),
                humidity: (50.0 + (h / 6.0).sin() * 20.0 + rng.random_range(0.0..10.0)).floor(),
                pressure: round1(
                    1013.0 + (h / 8.0).sin() * 5.0 + (rng.random_range(0.0..1.0) - 0.5) * 2.0,
                ),
                wind_speed: round1(10.0 + (h / 3.0).sin() * 8.0 + rng.random_range(0.0..5.0)),
                precipitation: round1(rng.random_range(0.0..2.0)),
                clouds: (40.0 + (h / 5.0).sin() * 30.0 + rng.random_range(0.0..20.0))
                    .clamp(0.0, 100.0)
                    .round(),
                uv_index: round1((uv_peak * daylight).clamp(0.0, 11.0)),
            }
        })
        .collect()
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One-call API response structures and conversion to internal models
pub mod openweather {
    use super::{CurrentConditions, FORECAST_HOURS, ForecastPoint, round1};
    use rand::RngExt;
    use serde::Deserialize;

    /// A recognized weather response shape.
    ///
    /// Only the one-call v3 and the basic current-weather formats are
    /// accepted; anything else fails decoding outright instead of being
    /// silently guessed at.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum Payload {
        OneCall(OneCallResponse),
        Basic(BasicResponse),
    }

    /// One-call v3 response
    #[derive(Debug, Deserialize)]
    pub struct OneCallResponse {
        pub current: CurrentBlock,
        pub hourly: Option<Vec<HourlyBlock>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentBlock {
        pub temp: f64,
        pub humidity: f64,
        pub pressure: f64,
        pub wind_speed: f64,
        pub wind_deg: Option<f64>,
        pub rain: Option<Precipitation>,
        pub snow: Option<Precipitation>,
        /// Visibility in meters
        pub visibility: Option<f64>,
        pub uvi: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourlyBlock {
        pub temp: f64,
        pub humidity: f64,
        pub pressure: f64,
        pub wind_speed: f64,
        pub rain: Option<Precipitation>,
        pub snow: Option<Precipitation>,
        pub clouds: Option<f64>,
        pub uvi: Option<f64>,
    }

    /// Basic current-weather response
    #[derive(Debug, Deserialize)]
    pub struct BasicResponse {
        pub main: MainBlock,
        pub wind: Option<WindBlock>,
        pub rain: Option<Precipitation>,
        /// Visibility in meters
        pub visibility: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub humidity: f64,
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindBlock {
        pub speed: Option<f64>,
        pub deg: Option<f64>,
    }

    /// Precipitation amounts keyed by accumulation window
    #[derive(Debug, Deserialize)]
    pub struct Precipitation {
        #[serde(rename = "1h")]
        pub one_hour: Option<f64>,
    }

    impl Precipitation {
        fn amount(&self) -> f64 {
            self.one_hour.unwrap_or(0.0)
        }
    }

    fn precipitation_mm(rain: Option<&Precipitation>, snow: Option<&Precipitation>) -> f64 {
        rain.map(Precipitation::amount)
            .filter(|&mm| mm > 0.0)
            .or_else(|| snow.map(Precipitation::amount))
            .unwrap_or(0.0)
    }

    impl Payload {
        /// Normalize the current block to display units.
        ///
        /// Wind arrives in m/s and is converted to km/h; visibility from
        /// meters to kilometers. The basic shape carries no UV index, so one
        /// is drawn from the supplied generator.
        pub fn into_current(self, rng: &mut impl RngExt) -> CurrentConditions {
            match self {
                Payload::OneCall(response) => {
                    let current = response.current;
                    CurrentConditions {
                        temperature: round1(current.temp),
                        humidity: current.humidity,
                        pressure: current.pressure,
                        wind_speed: round1(current.wind_speed * 3.6),
                        wind_direction: current.wind_deg.unwrap_or(0.0),
                        precipitation: precipitation_mm(
                            current.rain.as_ref(),
                            current.snow.as_ref(),
                        ),
                        visibility: current.visibility.map_or(10.0, |v| v / 1000.0),
                        uv_index: current.uvi.unwrap_or(0.0),
                    }
                }
                Payload::Basic(response) => CurrentConditions {
                    temperature: round1(response.main.temp),
                    humidity: response.main.humidity,
                    pressure: response.main.pressure,
                    wind_speed: round1(
                        response.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0) * 3.6,
                    ),
                    wind_direction: response.wind.as_ref().and_then(|w| w.deg).unwrap_or(0.0),
                    precipitation: precipitation_mm(response.rain.as_ref(), None),
                    visibility: response.visibility.map_or(10.0, |v| v / 1000.0),
                    uv_index: round1(rng.random_range(0.0..11.0)),
                },
            }
        }

        /// First 24 hourly entries as forecast points, when the shape has any
        pub fn hourly_forecast(&self) -> Option<Vec<ForecastPoint>> {
            let Payload::OneCall(response) = self else {
                return None;
            };
            let hourly = response.hourly.as_ref()?;
            if hourly.is_empty() {
                return None;
            }

            Some(
                hourly
                    .iter()
                    .take(FORECAST_HOURS)
                    .enumerate()
                    .map(|(hour, block)| ForecastPoint {
                        hour: hour as u8,
                        temperature: round1(block.temp),
                        humidity: block.humidity,
                        pressure: block.pressure,
                        wind_speed: round1(block.wind_speed * 3.6),
                        precipitation: precipitation_mm(block.rain.as_ref(), block.snow.as_ref()),
                        clouds: block.clouds.unwrap_or(0.0),
                        uv_index: block.uvi.unwrap_or(0.0),
                    })
                    .collect(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 15, 14, 0, 0).unwrap()
    }

    #[rstest]
    #[case(35.6762, 139.6503)]
    #[case(0.0, 0.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(-33.8688, 151.2093)]
    fn test_simulated_current_within_physical_ranges(#[case] lat: f64, #[case] lon: f64) {
        let mut rng = StdRng::seed_from_u64(7);
        let current = simulate_current(lat, lon, fixed_now(), &mut rng);

        assert!((20.0..=95.0).contains(&current.humidity));
        assert!((0.0..360.0).contains(&current.wind_direction));
        assert!(current.wind_speed >= 0.0);
        assert!((0.0..=11.0).contains(&current.uv_index));
        assert!(current.precipitation >= 0.0);
        assert!(current.visibility >= 10.0);
        assert!((900.0..1100.0).contains(&current.pressure));
        assert!(current.temperature.is_finite());
    }

    #[test]
    fn test_simulated_forecast_has_24_points_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let forecast = simulate_forecast(40.7128, &mut rng);

        assert_eq!(forecast.len(), FORECAST_HOURS);
        for (i, point) in forecast.iter().enumerate() {
            assert_eq!(point.hour as usize, i);
            assert!((0.0..=100.0).contains(&point.humidity));
            assert!((0.0..=100.0).contains(&point.clouds));
            assert!((0.0..=11.0).contains(&point.uv_index));
            assert!(point.wind_speed >= 0.0);
            assert!(point.precipitation >= 0.0);
        }
    }

    #[test]
    fn test_simulation_is_reproducible_with_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(
            simulate_current(48.1, 11.5, fixed_now(), &mut a),
            simulate_current(48.1, 11.5, fixed_now(), &mut b),
        );
    }

    #[test]
    fn test_onecall_payload_normalization() {
        let payload: openweather::Payload = serde_json::from_value(json!({
            "current": {
                "temp": 21.37,
                "humidity": 55.0,
                "pressure": 1009.0,
                "wind_speed": 5.0,
                "wind_deg": 210.0,
                "rain": {"1h": 0.4},
                "visibility": 8000.0,
                "uvi": 6.2
            },
            "hourly": [
                {"temp": 21.0, "humidity": 54.0, "pressure": 1009.0,
                 "wind_speed": 4.0, "clouds": 30.0, "uvi": 5.0}
            ]
        }))
        .unwrap();

        let forecast = payload.hourly_forecast().unwrap();
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].wind_speed, 14.4); // 4 m/s -> km/h

        let mut rng = StdRng::seed_from_u64(0);
        let current = payload.into_current(&mut rng);
        assert_eq!(current.temperature, 21.4);
        assert_eq!(current.wind_speed, 18.0); // 5 m/s -> km/h
        assert_eq!(current.visibility, 8.0); // 8000 m -> km
        assert_eq!(current.precipitation, 0.4);
        assert_eq!(current.uv_index, 6.2);
    }

    #[test]
    fn test_basic_payload_normalization() {
        let payload: openweather::Payload = serde_json::from_value(json!({
            "main": {"temp": -3.0, "humidity": 80.0, "pressure": 1021.0},
            "wind": {"speed": 10.0, "deg": 90.0},
            "visibility": 5000.0
        }))
        .unwrap();

        assert!(payload.hourly_forecast().is_none());

        let mut rng = StdRng::seed_from_u64(0);
        let current = payload.into_current(&mut rng);
        assert_eq!(current.temperature, -3.0);
        assert_eq!(current.wind_speed, 36.0);
        assert_eq!(current.visibility, 5.0);
        assert!((0.0..=11.0).contains(&current.uv_index));
    }

    #[test]
    fn test_unrecognized_shape_is_rejected() {
        let result: Result<openweather::Payload, _> =
            serde_json::from_value(json!({"message": "city not found", "cod": "404"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_failure_yields_simulated_bundle() {
        let mut rng = StdRng::seed_from_u64(3);
        let bundle = resolve(
            Err(anyhow::anyhow!("connection refused")),
            35.6762,
            139.6503,
            fixed_now(),
            &mut rng,
        );

        assert_eq!(bundle.source, DataSource::Simulated);
        assert_eq!(bundle.forecast.len(), FORECAST_HOURS);
    }

    #[test]
    fn test_snow_counts_as_precipitation() {
        let payload: openweather::Payload = serde_json::from_value(json!({
            "current": {
                "temp": -5.0,
                "humidity": 85.0,
                "pressure": 1015.0,
                "wind_speed": 8.0,
                "snow": {"1h": 1.2}
            }
        }))
        .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let current = payload.into_current(&mut rng);
        assert_eq!(current.precipitation, 1.2);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(21.37), 21.4);
        assert_eq!(round1(-3.04), -3.0);
    }
}
