use super::ds::{SensorReading, UpdateRequest};
use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const UPDATE_PATH: &str = "/api/update";
pub const SENSORS_PATH: &str = "/api/sensors";

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// What the simulator and the dashboard need from the backend.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn post_update(&self, update: &UpdateRequest) -> Result<(), AppError>;
    async fn fetch_sensors(&self) -> Result<Vec<SensorReading>, AppError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    update_url: String,
    sensors_url: String,
}

impl HttpBackend {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base = base_url.trim_end_matches('/');
        let client = reqwest::Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;
        Ok(Self { client, update_url: format!("{base}{UPDATE_PATH}"), sensors_url: format!("{base}{SENSORS_PATH}") })
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn post_update(&self, update: &UpdateRequest) -> Result<(), AppError> {
        let response = self.client.post(&self.update_url).json(update).send().await?;
        if response.status().is_success() {
            debug!(sensor_id = update.id, "Update accepted.");
            Ok(())
        } else {
            Err(AppError::Backend(response.status().as_u16()))
        }
    }

    async fn fetch_sensors(&self) -> Result<Vec<SensorReading>, AppError> {
        let response = self.client.get(&self.sensors_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Backend(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
