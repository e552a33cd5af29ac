use async_trait::async_trait;
use chrono::TimeZone;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

#[async_trait]
pub trait TimeProvider: Send + Sync + Debug {
    fn now(&self) -> i64; // Returns the current time as a Unix UTC timestamp
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug)]
pub struct RealTimeProvider;

#[async_trait]
impl TimeProvider for RealTimeProvider {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Waits out `interval` unless shutdown is requested first. Returns `false` on shutdown.
/// Once every sender is gone the channel is ignored and only the clock ends the wait.
pub async fn sleep_unless_shutdown(
    time_provider: &dyn TimeProvider, interval: Duration, shutdown_rx: &mut watch::Receiver<bool>,
) -> bool {
    let sleep = time_provider.sleep(interval);
    tokio::pin!(sleep);
    let mut listening = true;
    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            res = shutdown_rx.changed(), if listening => match res {
                Ok(()) if *shutdown_rx.borrow() => return false,
                Ok(()) => {}
                Err(_) => listening = false,
            },
        }
    }
}

/// Stamps log lines with the provider's clock instead of the wall clock.
pub struct ProviderTimeFormatter<T: TimeProvider> {
    pub time_provider: Arc<T>,
}

impl<T: TimeProvider> FormatTime for ProviderTimeFormatter<T> {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let ts = self.time_provider.now();
        match chrono::Utc.timestamp_opt(ts, 0).single() {
            Some(time) => write!(w, "{}", time.to_rfc3339()),
            None => write!(w, "{}", ts),
        }
    }
}
