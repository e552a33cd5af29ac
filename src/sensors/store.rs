use super::ds::{SensorReading, UpdateRequest};
use crate::error::AppError;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{trace, warn};

/// Latest reading per sensor id.
///
/// The id set is fixed at construction, so the map itself is never locked: each entry carries its own lock.
/// Updates to different ids never contend and updates to the same id serialize.
#[derive(Debug, Default)]
pub struct SensorStore {
    sensors: BTreeMap<u32, Mutex<SensorReading>>,
}

impl SensorStore {
    pub fn new(seed: impl IntoIterator<Item = SensorReading>) -> Self {
        let mut sensors = BTreeMap::new();
        for reading in seed {
            let id = reading.id;
            if sensors.insert(id, Mutex::new(reading)).is_some() {
                warn!(sensor_id = id, "Duplicate sensor id in seed, keeping the last entry.");
            }
        }
        Self { sensors }
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// All readings, ordered by id.
    pub async fn get_all(&self) -> Vec<SensorReading> {
        let mut all = Vec::with_capacity(self.sensors.len());
        for entry in self.sensors.values() {
            all.push(entry.lock().await.clone());
        }
        all
    }

    pub async fn get(&self, id: u32) -> Option<SensorReading> {
        let entry = self.sensors.get(&id)?;
        Some(entry.lock().await.clone())
    }

    pub async fn apply_update(&self, update: &UpdateRequest) -> Result<SensorReading, AppError> {
        self.apply_update_with(update, |reading| reading.clone()).await
    }

    /// Applies `update` and hands the new reading to `f` before the entry lock is released, so whatever `f`
    /// derives from the reading is consistent with what is stored.
    pub async fn apply_update_with<F, R>(&self, update: &UpdateRequest, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&SensorReading) -> R,
    {
        let entry = self.sensors.get(&update.id).ok_or(AppError::NotFound(update.id))?;
        let mut reading = entry.lock().await;
        reading.apply(update);
        trace!(sensor_id = update.id, moisture = reading.moisture, "Reading stored.");
        Ok(f(&reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::default_sensors;

    #[tokio::test]
    async fn update_then_get_returns_written_values() {
        let store = SensorStore::new(default_sensors());
        for id in 1..=3 {
            let before = store.get(id).await.unwrap();
            let update = UpdateRequest::new(id, 10. * id as f64, 70. + id as f64, 5.5 + id as f64 / 10.);
            store.apply_update(&update).await.unwrap();

            let after = store.get(id).await.unwrap();
            assert_eq!(after.id, before.id);
            assert_eq!(after.name, before.name);
            assert_eq!(after.moisture, update.moisture);
            assert_eq!(after.temp, update.temp);
            assert_eq!(after.ph, update.ph);
        }
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_and_store_unchanged() {
        let store = SensorStore::new(default_sensors());
        let before = store.get_all().await;

        let res = store.apply_update(&UpdateRequest::new(9, 1., 1., 1.)).await;
        assert!(matches!(res, Err(AppError::NotFound(9))));
        assert_eq!(store.get_all().await, before);
        assert!(store.get(9).await.is_none());
    }

    #[tokio::test]
    async fn population_is_fixed() {
        let store = SensorStore::new(default_sensors());
        assert_eq!(store.len(), 3);
        for moisture in [0., 25., 150.] {
            store.apply_update(&UpdateRequest::new(2, moisture, 70., 7.)).await.unwrap();
            assert_eq!(store.get_all().await.len(), 3);
        }
    }

    #[tokio::test]
    async fn get_all_is_ordered_by_id() {
        let store = SensorStore::new(vec![
            SensorReading::new(7, "C", 1., 1., 1.),
            SensorReading::new(2, "A", 1., 1., 1.),
            SensorReading::new(5, "B", 1., 1., 1.),
        ]);
        let ids: Vec<u32> = store.get_all().await.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }

    #[tokio::test]
    async fn empty_store() {
        let store = SensorStore::new(Vec::new());
        assert!(store.is_empty());
        assert!(store.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_seed_keeps_last() {
        let store = SensorStore::new(vec![
            SensorReading::new(1, "Old", 1., 1., 1.),
            SensorReading::new(1, "New", 2., 2., 2.),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).await.unwrap().name, "New");
    }
}
