use crate::time::TimeProvider;
use async_trait::async_trait;
use std::{
    sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

/// Clock that only moves when told to. `sleep` advances it instead of waiting, so polling loops run at full speed.
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_time: Arc<AtomicI64>,
    sleeps: Arc<AtomicUsize>,
}

impl MockTimeProvider {
    pub fn new(start_time: i64) -> Self {
        Self { current_time: Arc::new(AtomicI64::new(start_time)), sleeps: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn advance_time(&self, seconds: i64) {
        self.current_time.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> i64 {
        self.current_time.load(Ordering::SeqCst)
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance_time(duration.as_secs() as i64);
        tokio::task::yield_now().await;
    }
}
