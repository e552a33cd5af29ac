use crate::time::{ProviderTimeFormatter, TimeProvider};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
/// With a time provider, log lines carry its clock. A second call is a no-op.
pub fn start_log<T: TimeProvider + 'static>(time_provider: Option<Arc<T>>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let res = match time_provider {
        Some(time_provider) => builder.with_timer(ProviderTimeFormatter { time_provider }).try_init(),
        None => builder.try_init(),
    };
    if res.is_err() {
        debug!("Log subscriber already installed.");
    }
}

/// Local wall-clock time of day, e.g. `14:03:27`.
pub fn display_time(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(utc_time) => utc_time.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
        None => "--".to_owned(),
    }
}
