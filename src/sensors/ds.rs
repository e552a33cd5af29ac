use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub id: u32,
    pub name: String,
    /// percent
    #[serde(deserialize_with = "number_or_text")]
    pub moisture: f64,
    /// Fahrenheit
    #[serde(deserialize_with = "number_or_text")]
    pub temp: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub ph: f64,
}

impl SensorReading {
    pub fn new(id: u32, name: &str, moisture: f64, temp: f64, ph: f64) -> Self {
        Self { id, name: name.to_owned(), moisture, temp, ph }
    }

    /// Overwrites the mutable fields. `id` and `name` never change after seeding.
    pub fn apply(&mut self, update: &UpdateRequest) {
        self.moisture = update.moisture;
        self.temp = update.temp;
        self.ph = update.ph;
    }
}

/// Body of `POST /api/update`. No range checks: out-of-range values are stored as sent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct UpdateRequest {
    pub id: u32,
    #[serde(deserialize_with = "number_or_text")]
    pub moisture: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub temp: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub ph: f64,
}

impl UpdateRequest {
    pub fn new(id: u32, moisture: f64, temp: f64, ph: f64) -> Self {
        Self { id, moisture, temp, ph }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

// some producers send pH as a string ("6.3")
fn number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => {
            s.trim().parse::<f64>().map_err(|_| de::Error::custom(format!("expected a decimal number, got {s:?}")))
        }
    }
}
