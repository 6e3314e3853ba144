//! Plain-text rendering of a risk report

use crate::models::DataSource;
use crate::pipeline::RiskReport;
use crate::risk::RiskLabel;
use std::fmt::Write;

/// Render a report for terminal display
#[must_use]
pub fn render(report: &RiskReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Hazard assessment for {} ({})",
        report.location.name,
        report.location.format_coordinates()
    );
    let _ = writeln!(
        out,
        "Generated {} [{}]",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.source
    );
    out.push('\n');

    let current = &report.current;
    let _ = writeln!(
        out,
        "Current: {:.1}C, humidity {:.0}%, pressure {:.1} hPa, wind {:.1} km/h",
        current.temperature, current.humidity, current.pressure, current.wind_speed
    );
    let _ = writeln!(
        out,
        "         precip {:.1} mm, visibility {:.1} km, UV {:.1}",
        current.precipitation, current.visibility, current.uv_index
    );
    out.push('\n');

    let _ = writeln!(out, "Risk scores:");
    for (hazard, score) in report.risks.iter() {
        let _ = writeln!(
            out,
            "  {:<12} {:>5.1}  {:<8} (confidence {:.0}%)",
            hazard.label(),
            score,
            RiskLabel::from_score(score),
            report.confidence.get(hazard)
        );
    }
    let _ = writeln!(out, "  Overall confidence: {:.0}%", report.confidence.overall);

    if !report.alerts.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Active alerts:");
        for alert in &report.alerts {
            let _ = writeln!(out, "  [{}] {}", alert.severity, alert.event);
            if !alert.headline.is_empty() {
                let _ = writeln!(out, "    {}", alert.headline);
            }
        }
    }

    if !report.recent_quakes.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Recent earthquakes nearby:");
        for quake in &report.recent_quakes {
            let _ = writeln!(
                out,
                "  M{:.1} {} ({})",
                quake.magnitude,
                quake.place,
                quake.time.format("%Y-%m-%d %H:%M UTC")
            );
        }
    }

    if report.source == DataSource::Simulated {
        out.push('\n');
        let _ = writeln!(
            out,
            "Note: weather service unreachable, conditions above are simulated."
        );
    }

    out
}
