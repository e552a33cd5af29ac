//! Per-sensor alerting policy.
//!
//! Evaluated on the moisture value a sensor has just reported. The dashboard's field status uses a different
//! split (see `dashboard::FieldStatus`), the two are kept apart on purpose.

use crate::sensors::ds::SensorReading;
use serde::{Deserialize, Serialize};

/// Strictly below this a sensor is critical.
pub const CRITICAL_MOISTURE: f64 = 30.;
/// Strictly below this (and not critical) a sensor is drying out.
pub const CAUTION_MOISTURE: f64 = 50.;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Red,
    Yellow,
}

impl AlertLevel {
    pub fn for_moisture(moisture: f64) -> Option<Self> {
        if moisture < CRITICAL_MOISTURE {
            Some(AlertLevel::Red)
        } else if moisture < CAUTION_MOISTURE {
            Some(AlertLevel::Yellow)
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Alert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub text: String,
}

impl Alert {
    pub fn evaluate(reading: &SensorReading) -> Option<Self> {
        let level = AlertLevel::for_moisture(reading.moisture)?;
        let text = match level {
            AlertLevel::Red => format!("CRITICAL: {} moisture critical at {}%!", reading.name, reading.moisture),
            AlertLevel::Yellow => format!("Caution: {} is drying out.", reading.name),
        };
        Some(Self { level, text })
    }
}
