//! Per-hazard risk scoring
//!
//! Six independent additive heuristics, one per hazard. Each combines a
//! geographic membership bonus, clamped meteorological terms, a seasonal
//! bonus and a fraction of the synthetic historical score, then clamps the
//! total to [0, 100]. Deterministic given their inputs; the only randomness
//! lives in the historical synthesis and the confidence jitter.

use crate::history::HistoricalPatterns;
use crate::models::{ConfidenceSet, CurrentConditions, ForecastPoint, Hazard, HazardRiskSet};
use crate::seismic::SeismicEvent;
use chrono::{DateTime, Datelike, Utc};
use rand::RngExt;

/// Days of seismic lookback that still count as recent activity
const RECENT_QUAKE_DAYS: i64 = 7;

/// Confidence baseline before jitter
const CONFIDENCE_BASE: f64 = 85.0;

/// Everything the scoring functions read for one location
#[derive(Debug, Clone, Copy)]
pub struct RiskContext<'a> {
    pub current: &'a CurrentConditions,
    pub forecast: &'a [ForecastPoint],
    pub latitude: f64,
    pub longitude: f64,
    pub history: &'a HistoricalPatterns,
    pub recent_quakes: &'a [SeismicEvent],
    pub now: DateTime<Utc>,
}

impl RiskContext<'_> {
    /// Score all six hazards atomically
    #[must_use]
    pub fn scores(&self) -> HazardRiskSet {
        HazardRiskSet::from_scores([
            (Hazard::Tornado, self.tornado_risk()),
            (Hazard::Flood, self.flood_risk()),
            (Hazard::Wildfire, self.wildfire_risk()),
            (Hazard::Hurricane, self.hurricane_risk()),
            (Hazard::Earthquake, self.earthquake_risk()),
            (Hazard::Blizzard, self.blizzard_risk()),
        ])
    }

    fn month(&self) -> u32 {
        self.now.month()
    }

    fn tornado_risk(&self) -> f64 {
        let mut risk = 0.0;

        let in_tornado_alley = self.latitude > 25.0
            && self.latitude < 50.0
            && self.longitude > -105.0
            && self.longitude < -85.0;
        if in_tornado_alley {
            risk += 30.0;
        }

        // Atmospheric instability from the forecast temperature spread
        let temp_gradient = temperature_spread(self.forecast);
        risk += (temp_gradient * 1.5).min(20.0);

        let wind_shear = if self.current.wind_speed > 20.0 {
            (self.current.wind_speed - 20.0) * 2.0
        } else {
            0.0
        };
        risk += wind_shear.min(25.0);

        let pressure_drop = 1013.0 - self.current.pressure;
        risk += (pressure_drop * 0.8).min(15.0);

        if self.current.humidity > 60.0 && self.current.temperature > 15.0 {
            risk += 10.0;
        }

        // Peak season April through August
        if (4..=8).contains(&self.month()) {
            risk += 10.0;
        }

        risk += self.history.risk_score(Hazard::Tornado) * 0.3;

        risk.clamp(0.0, 100.0)
    }

    fn flood_risk(&self) -> f64 {
        let mut risk = 0.0;

        let total_precip = if self.forecast.is_empty() {
            self.current.precipitation * 24.0
        } else {
            self.forecast.iter().map(|f| f.precipitation).sum()
        };
        risk += (total_precip * 8.0).min(40.0);

        // Soil saturation proxy
        if self.current.humidity > 85.0 {
            risk += 20.0;
        }

        // Coarse river-basin simulation
        let river_proximity =
            (self.latitude * 0.1).sin() * (self.longitude * 0.1).cos();
        risk += river_proximity.abs() * 15.0;

        let is_coastal = (self.longitude % 10.0).abs() < 2.0;
        if is_coastal && self.current.wind_speed > 25.0 {
            risk += 25.0;
        }

        if self.latitude.abs() < 45.0 {
            risk += 5.0;
        }

        risk += self.history.risk_score(Hazard::Flood) * 0.4;

        risk.clamp(0.0, 100.0)
    }

    fn wildfire_risk(&self) -> f64 {
        let mut risk = 0.0;

        let temperature = self.current.temperature;
        let humidity = self.current.humidity;

        if temperature > 25.0 && humidity < 30.0 {
            risk += 30.0;
        }
        if temperature > 35.0 && humidity < 20.0 {
            risk += 25.0;
        }

        risk += (self.current.wind_speed * 1.2).min(20.0);

        let recent_precip: f64 = if self.forecast.is_empty() {
            self.current.precipitation * 7.0
        } else {
            self.forecast.iter().take(7).map(|f| f.precipitation).sum()
        };
        if recent_precip < 5.0 {
            risk += 20.0;
        }

        // Western US and southeastern Australia
        let fire_prone = (self.latitude > 30.0
            && self.latitude < 50.0
            && self.longitude > -125.0
            && self.longitude < -100.0)
            || (self.latitude > -35.0
                && self.latitude < -25.0
                && self.longitude > 110.0
                && self.longitude < 155.0);
        if fire_prone {
            risk += 25.0;
        }

        // Vegetation dryness proxy
        if self.current.uv_index > 7.0 {
            risk += 10.0;
        }

        risk += self.history.risk_score(Hazard::Wildfire) * 0.3;

        risk.clamp(0.0, 100.0)
    }

    fn hurricane_risk(&self) -> f64 {
        let mut risk = 0.0;

        let atlantic_basin = self.latitude > 5.0
            && self.latitude < 45.0
            && self.longitude > -100.0
            && self.longitude < -20.0;
        let pacific_basin = self.latitude > 5.0
            && self.latitude < 45.0
            && self.longitude > -180.0
            && self.longitude < -80.0;
        if atlantic_basin || pacific_basin {
            risk += 40.0;
        }

        if self.current.temperature > 26.0 {
            risk += 20.0;
        }
        if self.current.pressure < 1005.0 {
            risk += 25.0;
        }
        if self.current.wind_speed > 15.0 {
            risk += 15.0;
        }

        // June-November in the northern hemisphere, December-May south of it
        let in_season = if self.latitude >= 0.0 {
            (6..=11).contains(&self.month())
        } else {
            !(6..=11).contains(&self.month())
        };
        if in_season {
            risk += 10.0;
        }

        risk += self.history.risk_score(Hazard::Hurricane) * 0.3;

        risk.clamp(0.0, 100.0)
    }

    fn earthquake_risk(&self) -> f64 {
        let mut risk = self.history.risk_score(Hazard::Earthquake);

        let recent: Vec<&SeismicEvent> = self
            .recent_quakes
            .iter()
            .filter(|quake| quake.within_days(self.now, RECENT_QUAKE_DAYS))
            .collect();

        risk += recent.len() as f64 * 10.0;
        for quake in recent {
            if quake.magnitude > 4.0 {
                risk += quake.magnitude * 5.0;
            }
        }

        risk.clamp(0.0, 100.0)
    }

    fn blizzard_risk(&self) -> f64 {
        let mut risk = 0.0;

        if self.current.temperature < 0.0 {
            risk += self.current.temperature.abs() * 3.0;
        }
        if self.current.wind_speed > 20.0 {
            risk += 20.0;
        }
        if self.latitude.abs() > 40.0 {
            risk += 25.0;
        }

        // Cold season by hemisphere
        let in_season = if self.latitude >= 0.0 {
            !(4..=10).contains(&self.month())
        } else {
            (4..=10).contains(&self.month())
        };
        if in_season {
            risk += 10.0;
        }

        risk += self.history.risk_score(Hazard::Blizzard) * 0.3;

        risk.clamp(0.0, 100.0)
    }
}

fn temperature_spread(forecast: &[ForecastPoint]) -> f64 {
    if forecast.is_empty() {
        return 0.0;
    }
    let max = forecast.iter().map(|f| f.temperature).fold(f64::MIN, f64::max);
    let min = forecast.iter().map(|f| f.temperature).fold(f64::MAX, f64::min);
    max - min
}

/// Confidence percentages: a constant baseline plus bounded jitter.
///
/// Not derived from data provenance or quality. Preserved as-is rather than
/// replaced with a real confidence model.
pub fn confidence(rng: &mut impl RngExt) -> ConfidenceSet {
    let per_hazard: Vec<(Hazard, f64)> = Hazard::ALL
        .iter()
        .map(|&hazard| (hazard, CONFIDENCE_BASE + rng.random_range(0.0..10.0)))
        .collect();
    let overall =
        (per_hazard.iter().map(|(_, v)| v).sum::<f64>() / per_hazard.len() as f64).floor();
    ConfidenceSet::from_values(per_hazard, overall)
}

/// Qualitative bands for a 0-100 risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLabel {
    /// Band for a score; scores are assumed already clamped to [0, 100]
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            RiskLabel::Low
        } else if score < 50.0 {
            RiskLabel::Medium
        } else if score < 75.0 {
            RiskLabel::High
        } else {
            RiskLabel::Critical
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
            RiskLabel::Critical => "Critical",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn calm_conditions() -> CurrentConditions {
        CurrentConditions {
            temperature: 18.0,
            humidity: 50.0,
            pressure: 1013.0,
            wind_speed: 10.0,
            wind_direction: 180.0,
            precipitation: 0.0,
            visibility: 10.0,
            uv_index: 4.0,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
    }

    fn history_at(lat: f64, lon: f64) -> HistoricalPatterns {
        let mut rng = StdRng::seed_from_u64(1);
        HistoricalPatterns::synthesize(lat, lon, fixed_now(), &mut rng)
    }

    fn context_at<'a>(
        lat: f64,
        lon: f64,
        current: &'a CurrentConditions,
        history: &'a HistoricalPatterns,
        quakes: &'a [SeismicEvent],
    ) -> RiskContext<'a> {
        RiskContext {
            current,
            forecast: &[],
            latitude: lat,
            longitude: lon,
            history,
            recent_quakes: quakes,
            now: fixed_now(),
        }
    }

    #[rstest]
    #[case(36.154, -95.9928)] // tornado alley
    #[case(25.7617, -80.1918)] // Atlantic hurricane basin
    #[case(35.6762, 139.6503)] // pacific ring
    #[case(-85.0, 170.0)]
    #[case(85.0, -170.0)]
    fn test_all_scores_bounded(#[case] lat: f64, #[case] lon: f64) {
        let extreme = CurrentConditions {
            temperature: 45.0,
            humidity: 95.0,
            pressure: 950.0,
            wind_speed: 120.0,
            wind_direction: 0.0,
            precipitation: 30.0,
            visibility: 0.5,
            uv_index: 11.0,
        };
        let history = history_at(lat, lon);
        let scores = context_at(lat, lon, &extreme, &history, &[]).scores();

        assert_eq!(scores.len(), 6);
        for (hazard, score) in scores.iter() {
            assert!((0.0..=100.0).contains(&score), "{hazard}: {score}");
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let current = calm_conditions();
        let history = history_at(36.154, -95.9928);
        let ctx = context_at(36.154, -95.9928, &current, &history, &[]);
        assert_eq!(ctx.scores(), ctx.scores());
    }

    #[test]
    fn test_tornado_alley_raises_tornado_risk() {
        let current = calm_conditions();
        let alley_history = history_at(36.154, -95.9928);
        let tokyo_history = history_at(35.6762, 139.6503);

        let alley = context_at(36.154, -95.9928, &current, &alley_history, &[]).tornado_risk();
        let tokyo = context_at(35.6762, 139.6503, &current, &tokyo_history, &[]).tornado_risk();
        assert!(alley > tokyo);
    }

    #[test]
    fn test_recent_quakes_raise_earthquake_risk() {
        let current = calm_conditions();
        let history = history_at(51.5074, -0.1278);

        let quakes = vec![
            SeismicEvent {
                magnitude: 5.5,
                place: "near".to_string(),
                time: fixed_now() - chrono::Duration::days(2),
                latitude: 51.0,
                longitude: 0.0,
                depth_km: 10.0,
            },
            SeismicEvent {
                magnitude: 6.0,
                place: "old".to_string(),
                time: fixed_now() - chrono::Duration::days(30),
                latitude: 51.0,
                longitude: 0.0,
                depth_km: 10.0,
            },
        ];

        let quiet = context_at(51.5074, -0.1278, &current, &history, &[]).earthquake_risk();
        let active = context_at(51.5074, -0.1278, &current, &history, &quakes).earthquake_risk();

        // One recent magnitude-5.5 event adds 10 + 27.5; the 30-day-old one
        // adds nothing.
        assert!((active - quiet - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_cold_windy_high_latitude_blizzard() {
        let cold = CurrentConditions {
            temperature: -15.0,
            wind_speed: 35.0,
            ..calm_conditions()
        };
        let history = history_at(64.1466, -21.9426);
        let risk = context_at(64.1466, -21.9426, &cold, &history, &[]).blizzard_risk();
        // 45 from cold, 20 wind, 25 latitude already saturate the scale
        assert!(risk >= 90.0);
    }

    #[test]
    fn test_hot_dry_windy_wildfire() {
        let scorching = CurrentConditions {
            temperature: 38.0,
            humidity: 15.0,
            wind_speed: 40.0,
            uv_index: 9.0,
            ..calm_conditions()
        };
        let history = history_at(34.0522, -118.2437);
        let risk = context_at(34.0522, -118.2437, &scorching, &history, &[]).wildfire_risk();
        assert!(risk >= 90.0);
    }

    #[rstest]
    #[case(0.0, RiskLabel::Low)]
    #[case(24.9, RiskLabel::Low)]
    #[case(25.0, RiskLabel::Medium)]
    #[case(49.9, RiskLabel::Medium)]
    #[case(50.0, RiskLabel::High)]
    #[case(74.9, RiskLabel::High)]
    #[case(75.0, RiskLabel::Critical)]
    #[case(100.0, RiskLabel::Critical)]
    fn test_risk_label_bands(#[case] score: f64, #[case] expected: RiskLabel) {
        assert_eq!(RiskLabel::from_score(score), expected);
    }

    #[test]
    fn test_confidence_is_baseline_plus_jitter() {
        let mut rng = StdRng::seed_from_u64(5);
        let confidence = confidence(&mut rng);

        for hazard in Hazard::ALL {
            let value = confidence.get(hazard);
            assert!((85.0..95.0).contains(&value), "{hazard}: {value}");
        }
        assert!((85.0..95.0).contains(&confidence.overall));
        assert_eq!(confidence.overall, confidence.overall.floor());
    }
}
