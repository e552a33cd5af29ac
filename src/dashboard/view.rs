use crate::{alerts::AlertLevel, sensors::ds::SensorReading};
use std::fmt;

/// Above this the field (or a zone) is optimal.
pub const OPTIMAL_ABOVE: f64 = 60.;
/// Above this, and not optimal, it needs attention soon. At or below it is critical.
pub const CAUTION_ABOVE: f64 = 40.;
/// A zone's valve opens when its moisture drops under this.
pub const VALVE_OPEN_BELOW: f64 = 40.;

pub const OFFLINE_LABEL: &str = "Offline (Backend not running)";
const NOMINAL_TEXT: &str = "System Nominal: All zones within optimal range.";
const MISSING: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Optimal,
    Caution,
    Critical,
}

impl FieldStatus {
    pub fn from_moisture(moisture: f64) -> Self {
        if moisture > OPTIMAL_ABOVE {
            FieldStatus::Optimal
        } else if moisture > CAUTION_ABOVE {
            FieldStatus::Caution
        } else {
            FieldStatus::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldStatus::Optimal => "Optimal",
            FieldStatus::Caution => "Caution",
            FieldStatus::Critical => "Critical",
        }
    }

    pub fn insight(&self) -> &'static str {
        match self {
            FieldStatus::Optimal => "Soil moisture is ideal. No action needed.",
            FieldStatus::Caution => "Moisture dropping. Prepare to irrigate soon.",
            FieldStatus::Critical => "CRITICAL: Soil too dry! Immediate irrigation required.",
        }
    }
}

/// Field-wide means. All `None` when no sensor reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSummary {
    pub avg_moisture: Option<f64>,
    pub avg_temp: Option<f64>,
    pub avg_ph: Option<f64>,
    pub active_sensors: usize,
}

impl FieldSummary {
    pub fn compute(sensors: &[SensorReading]) -> Self {
        if sensors.is_empty() {
            return Self::default();
        }
        let n = sensors.len() as f64;
        let mean = |f: fn(&SensorReading) -> f64| sensors.iter().map(f).sum::<f64>() / n;
        Self {
            avg_moisture: Some(round_half_up(mean(|s: &SensorReading| s.moisture))),
            avg_temp: Some(round_half_up(mean(|s: &SensorReading| s.temp))),
            avg_ph: Some(round_half_up(mean(|s: &SensorReading| s.ph) * 10.) / 10.),
            active_sensors: sensors.len(),
        }
    }

    pub fn status(&self) -> Option<FieldStatus> {
        self.avg_moisture.map(FieldStatus::from_moisture)
    }
}

// halves go up, -2.5 -> -2
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneView {
    pub name: String,
    pub moisture: f64,
    pub band: FieldStatus,
    pub valve_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneAlert {
    pub level: Option<AlertLevel>,
    pub text: String,
}

/// Per-sensor alert lines, using the same thresholds as the backend alerting but the dashboard's wording.
pub fn zone_alerts(sensors: &[SensorReading]) -> Vec<ZoneAlert> {
    let alerts: Vec<ZoneAlert> = sensors
        .iter()
        .filter_map(|s| {
            let level = AlertLevel::for_moisture(s.moisture)?;
            let text = match level {
                AlertLevel::Red => format!("Critical: {} moisture critical at {}%", s.name, s.moisture),
                AlertLevel::Yellow => format!("Caution: {} is drying out ({}%)", s.name, s.moisture),
            };
            Some(ZoneAlert { level: Some(level), text })
        })
        .collect();

    if alerts.is_empty() {
        vec![ZoneAlert { level: None, text: NOMINAL_TEXT.to_owned() }]
    } else {
        alerts
    }
}

/// Everything the dashboard shows for one poll. Built only from its inputs, so equal inputs render equally.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: FieldSummary,
    pub status: Option<FieldStatus>,
    pub zones: Vec<ZoneView>,
    pub alerts: Vec<ZoneAlert>,
    pub auto_mode: bool,
    pub sync_label: String,
}

impl DashboardView {
    pub fn build(sensors: &[SensorReading], sync_label: &str, auto_mode: bool) -> Self {
        let summary = FieldSummary::compute(sensors);
        let zones = sensors
            .iter()
            .map(|s| ZoneView {
                name: s.name.clone(),
                moisture: s.moisture,
                band: FieldStatus::from_moisture(s.moisture),
                valve_open: s.moisture < VALVE_OPEN_BELOW,
            })
            .collect();
        Self {
            status: summary.status(),
            summary,
            zones,
            alerts: zone_alerts(sensors),
            auto_mode,
            sync_label: sync_label.to_owned(),
        }
    }
}

fn or_missing(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_owned())
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(
            f,
            "Moisture: {}% | Temp: {}°F | pH: {} | Sensors: {} | Last sync: {}",
            or_missing(s.avg_moisture),
            or_missing(s.avg_temp),
            s.avg_ph.map(|ph| format!("{ph:.1}")).unwrap_or_else(|| MISSING.to_owned()),
            s.active_sensors,
            self.sync_label
        )?;
        if let Some(status) = self.status {
            writeln!(f, "[{}] {}", status.label(), status.insight())?;
        }

        writeln!(f, "Zones:")?;
        for zone in &self.zones {
            writeln!(f, "  {:<12} {:>5}%  {}", zone.name, zone.moisture, zone.band.label())?;
        }

        writeln!(f, "Irrigation ({}):", if self.auto_mode { "auto" } else { "manual" })?;
        for zone in &self.zones {
            writeln!(f, "  {} Valve: {}", zone.name, if zone.valve_open { "open" } else { "closed" })?;
        }

        writeln!(f, "Alerts:")?;
        for alert in &self.alerts {
            let tag = match alert.level {
                Some(AlertLevel::Red) => "red",
                Some(AlertLevel::Yellow) => "yellow",
                None => "green",
            };
            writeln!(f, "  ({tag}) {}", alert.text)?;
        }
        Ok(())
    }
}
