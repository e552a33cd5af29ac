pub mod ds;
pub mod interface;
pub mod store;

use ds::SensorReading;

/// Factory seed used when the config file does not list any sensors.
pub fn default_sensors() -> Vec<SensorReading> {
    vec![
        SensorReading::new(1, "North Zone", 60., 75., 6.5),
        SensorReading::new(2, "East Zone", 50., 76., 6.2),
        SensorReading::new(3, "South Zone", 45., 78., 6.0),
    ]
}
