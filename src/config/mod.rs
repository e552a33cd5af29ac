pub mod run_options;

use crate::{
    error::AppError,
    sensors::{default_sensors, ds::SensorReading},
    MAX_MSGS,
};
use run_options::Args;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::warn;

pub const CONFIG_FILE: &str = "./pulse.toml";

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
const DEFAULT_INTERVAL_SECS: u64 = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebServer {
    pub address: String,
    pub static_dir: Option<PathBuf>,
}

impl Default for WebServer {
    fn default() -> Self {
        Self { address: "0.0.0.0:3000".to_owned(), static_dir: None }
    }
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Broadcast {
    pub capacity: usize,
}

impl Default for Broadcast {
    fn default() -> Self {
        Self { capacity: MAX_MSGS }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Simulator {
    pub backend_url: String,
    pub interval_secs: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { backend_url: DEFAULT_BACKEND_URL.to_owned(), interval_secs: DEFAULT_INTERVAL_SECS }
    }
}

impl Simulator {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub backend_url: String,
    pub interval_secs: u64,
    /// valves are display-only while auto mode is on
    pub auto_mode: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self { backend_url: DEFAULT_BACKEND_URL.to_owned(), interval_secs: DEFAULT_INTERVAL_SECS, auto_mode: true }
    }
}

impl Dashboard {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web_server: WebServer,
    pub broadcast: Broadcast,
    pub sensors: Vec<SensorReading>,
    pub simulator: Simulator,
    pub dashboard: Dashboard,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_server: WebServer::default(),
            broadcast: Broadcast::default(),
            sensors: default_sensors(),
            simulator: Simulator::default(),
            dashboard: Dashboard::default(),
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, AppError> {
        if let Some(cfg_str) = &args.cfg_str {
            return Self::load_from_str(cfg_str);
        }
        if !args.cfg_file.exists() {
            warn!(file = %args.cfg_file.display(), "Config file not found, using defaults.");
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(&args.cfg_file)
            .map_err(|e| AppError::Config(format!("unable to read {}: {e}", args.cfg_file.display())))?;
        Self::load_from_str(&config_content)
    }

    pub fn load_from_str(config_str: &str) -> Result<Self, AppError> {
        let config: Config = toml::from_str(config_str).map_err(|e| AppError::Config(e.to_string()))?;
        if config.simulator.interval_secs == 0 {
            return Err(AppError::Config("simulator.interval_secs must be at least 1".to_owned()));
        }
        if config.dashboard.interval_secs == 0 {
            return Err(AppError::Config("dashboard.interval_secs must be at least 1".to_owned()));
        }
        if config.sensors.is_empty() {
            warn!("No sensors configured, the store will stay empty.");
        }
        Ok(config)
    }
}
