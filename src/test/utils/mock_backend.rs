use crate::{
    error::AppError,
    sensors::{
        default_sensors,
        ds::{SensorReading, UpdateRequest},
        interface::BackendClient,
    },
    simulator::{ReadingSource, Zone},
};
use async_trait::async_trait;
use mockall::mock;
use std::sync::{Arc, Mutex};
use tracing::trace;

mock! {
    pub BackendClient {}

    #[async_trait]
    impl BackendClient for BackendClient {
        async fn post_update(&self, update: &UpdateRequest) -> Result<(), AppError>;
        async fn fetch_sensors(&self) -> Result<Vec<SensorReading>, AppError>;
    }
}

mock! {
    pub ReadingSource {}

    impl ReadingSource for ReadingSource {
        fn next_reading(&self, zones: &[Zone]) -> Result<UpdateRequest, AppError>;
    }
}

/// Backend that accepts every update and records it.
pub fn set_backend_recording(posted: Arc<Mutex<Vec<UpdateRequest>>>) -> Arc<MockBackendClient> {
    let mut backend = MockBackendClient::new();
    backend.expect_post_update().times(0..).returning(move |update| {
        trace!(sensor_id = update.id, "Mocked post");
        if let Ok(mut posted) = posted.lock() {
            posted.push(*update);
        }
        Ok(())
    });
    backend.expect_fetch_sensors().times(0..).returning(|| Ok(default_sensors()));
    Arc::new(backend)
}

/// Backend that is never reachable.
pub fn set_backend_down() -> Arc<MockBackendClient> {
    let mut backend = MockBackendClient::new();
    backend.expect_post_update().times(0..).returning(|_| Err(AppError::Backend(503)));
    backend.expect_fetch_sensors().times(0..).returning(|| Err(AppError::Backend(503)));
    Arc::new(backend)
}

/// Source that always reports the same reading.
pub fn set_fixed_source(update: UpdateRequest) -> Arc<MockReadingSource> {
    let mut source = MockReadingSource::new();
    source.expect_next_reading().times(0..).returning(move |_| Ok(update));
    Arc::new(source)
}
