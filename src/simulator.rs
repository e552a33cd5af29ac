//! Synthetic reading producer standing in for field sensors.
//!
//! Every interval one zone is picked at random and a fresh reading for it is posted to the backend. A failed
//! post is logged and the next tick carries on, there is no retry.

use crate::{
    error::AppError,
    sensors::{
        ds::{SensorReading, UpdateRequest},
        interface::BackendClient,
    },
    time::{sleep_unless_shutdown, TimeProvider},
};
use std::{ops::RangeInclusive, sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{error, info};

pub const MOISTURE_RANGE: RangeInclusive<i64> = 20..=90;
/// Fahrenheit
pub const TEMP_RANGE: RangeInclusive<i64> = 70..=95;
pub const PH_RANGE: RangeInclusive<f64> = 5.5..=7.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: u32,
    pub name: String,
}

impl From<&SensorReading> for Zone {
    fn from(reading: &SensorReading) -> Self {
        Self { id: reading.id, name: reading.name.clone() }
    }
}

pub trait ReadingSource: Send + Sync {
    /// Picks a zone and produces a reading for it.
    fn next_reading(&self, zones: &[Zone]) -> Result<UpdateRequest, AppError>;
}

/// Uniform readings drawn from the OS entropy source.
#[derive(Debug, Default)]
pub struct RandomReadings;

impl RandomReadings {
    fn next_u32() -> Result<u32, AppError> {
        let mut buf = [0u8; 4];
        getrandom::getrandom(&mut buf).map_err(|e| AppError::Entropy(e.to_string()))?;
        Ok(u32::from_le_bytes(buf))
    }

    fn int_in(range: &RangeInclusive<i64>) -> Result<i64, AppError> {
        let span = (range.end() - range.start() + 1) as u64;
        Ok(range.start() + (Self::next_u32()? as u64 % span) as i64)
    }

    // one decimal, like a handheld pH meter
    fn tenths_in(range: &RangeInclusive<f64>) -> Result<f64, AppError> {
        let unit = Self::next_u32()? as f64 / (u32::MAX as f64 + 1.);
        let value = range.start() + unit * (range.end() - range.start());
        Ok(((value * 10.).round() / 10.).clamp(*range.start(), *range.end()))
    }
}

impl ReadingSource for RandomReadings {
    fn next_reading(&self, zones: &[Zone]) -> Result<UpdateRequest, AppError> {
        if zones.is_empty() {
            return Err(AppError::Config("simulator has no zones to report for".to_owned()));
        }
        let zone = &zones[Self::next_u32()? as usize % zones.len()];
        Ok(UpdateRequest::new(
            zone.id,
            Self::int_in(&MOISTURE_RANGE)? as f64,
            Self::int_in(&TEMP_RANGE)? as f64,
            Self::tenths_in(&PH_RANGE)?,
        ))
    }
}

pub struct Simulator {
    pub zones: Vec<Zone>,
    pub source: Arc<dyn ReadingSource>,
    pub backend: Arc<dyn BackendClient>,
    pub time_provider: Arc<dyn TimeProvider>,
    pub interval: Duration,
}

impl Simulator {
    pub fn new(
        zones: Vec<Zone>, source: Arc<dyn ReadingSource>, backend: Arc<dyn BackendClient>,
        time_provider: Arc<dyn TimeProvider>, interval: Duration,
    ) -> Self {
        Self { zones, source, backend, time_provider, interval }
    }

    fn zone_name(&self, id: u32) -> &str {
        self.zones.iter().find(|z| z.id == id).map(|z| z.name.as_str()).unwrap_or("unknown zone")
    }

    /// Produces one reading and posts it.
    pub async fn tick(&self) -> Result<UpdateRequest, AppError> {
        let update = self.source.next_reading(&self.zones)?;
        self.backend.post_update(&update).await?;
        Ok(update)
    }

    /// Posts a reading every interval until shutdown or, when given, `max_ticks` readings were attempted.
    /// Returns how many were accepted.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>, max_ticks: Option<usize>) -> usize {
        info!("PrecisionPulse simulator started, sending sensor data every {:?}.", self.interval);
        let (mut attempted, mut sent) = (0, 0);
        loop {
            if *shutdown_rx.borrow() || max_ticks.is_some_and(|max| attempted >= max) {
                break;
            }
            if !sleep_unless_shutdown(self.time_provider.as_ref(), self.interval, &mut shutdown_rx).await {
                break;
            }

            attempted += 1;
            match self.tick().await {
                Ok(update) => {
                    sent += 1;
                    info!(
                        " -> Sent: {} | Moisture: {}% | Temp: {}°F",
                        self.zone_name(update.id),
                        update.moisture,
                        update.temp
                    );
                }
                Err(e) => error!(error = %e, "Error sending data: is the server running?"),
            }
        }
        info!(sent, "Simulator stopped.");
        sent
    }
}
