pub mod view;

use crate::{
    sensors::{ds::SensorReading, interface::BackendClient},
    time::{sleep_unless_shutdown, TimeProvider},
    utils::display_time,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, error};
use view::{DashboardView, OFFLINE_LABEL};

/// Polling aggregator. Keeps the readings of the last successful poll so an offline backend
/// only changes the sync label.
pub struct DashboardClient {
    pub backend: Arc<dyn BackendClient>,
    pub time_provider: Arc<dyn TimeProvider>,
    pub interval: Duration,
    pub auto_mode: bool,
    pub sensors: Vec<SensorReading>,
}

impl DashboardClient {
    pub fn new(
        backend: Arc<dyn BackendClient>, time_provider: Arc<dyn TimeProvider>, interval: Duration, auto_mode: bool,
    ) -> Self {
        Self { backend, time_provider, interval, auto_mode, sensors: Vec::new() }
    }

    pub async fn poll_once(&mut self) -> DashboardView {
        let sync_label = match self.backend.fetch_sensors().await {
            Ok(sensors) => {
                debug!(count = sensors.len(), "Fetched sensors.");
                self.sensors = sensors;
                display_time(self.time_provider.now())
            }
            Err(e) => {
                error!(error = %e, "Error connecting to backend.");
                OFFLINE_LABEL.to_owned()
            }
        };
        DashboardView::build(&self.sensors, &sync_label, self.auto_mode)
    }

    /// Polls right away, then once per interval, handing each view to `render`.
    /// Stops on shutdown or after `max_polls`. Returns the number of polls made.
    pub async fn run<F>(
        &mut self, mut shutdown_rx: watch::Receiver<bool>, max_polls: Option<usize>, mut render: F,
    ) -> usize
    where
        F: FnMut(&DashboardView),
    {
        let mut polls = 0;
        loop {
            if *shutdown_rx.borrow() || max_polls.is_some_and(|max| polls >= max) {
                break;
            }
            let view = self.poll_once().await;
            render(&view);
            polls += 1;

            if max_polls.is_some_and(|max| polls >= max)
                || !sleep_unless_shutdown(self.time_provider.as_ref(), self.interval, &mut shutdown_rx).await
            {
                break;
            }
        }
        polls
    }
}
