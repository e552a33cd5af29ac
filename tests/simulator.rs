use pulse::error::AppError;
use pulse::sensors::default_sensors;
use pulse::sensors::ds::UpdateRequest;
use pulse::simulator::{RandomReadings, Simulator, Zone};
use pulse::test::utils::mock_backend::{set_backend_down, set_backend_recording, set_fixed_source, MockReadingSource};
use pulse::test::utils::mock_time::MockTimeProvider;
use pulse::time::TimeProvider;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::watch;

fn zones() -> Vec<Zone> {
    default_sensors().iter().map(Zone::from).collect()
}

#[tokio::test]
async fn posts_one_reading_per_interval() {
    let posted = Arc::new(Mutex::new(Vec::new()));
    let time_provider = Arc::new(MockTimeProvider::new(0));
    let simulator = Simulator::new(
        zones(),
        Arc::new(RandomReadings),
        set_backend_recording(posted.clone()),
        time_provider.clone(),
        Duration::from_secs(3),
    );

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    assert_eq!(simulator.run(shutdown_rx, Some(5)).await, 5);

    assert_eq!(posted.lock().unwrap().len(), 5);
    assert_eq!(time_provider.sleeps(), 5);
    assert_eq!(time_provider.now(), 15);
    for update in posted.lock().unwrap().iter() {
        assert!((1..=3).contains(&update.id));
    }
}

#[tokio::test]
async fn backend_down_is_logged_and_retried_next_tick() {
    let time_provider = Arc::new(MockTimeProvider::new(0));
    let simulator = Simulator::new(
        zones(),
        set_fixed_source(UpdateRequest::new(1, 40., 80., 6.4)),
        set_backend_down(),
        time_provider.clone(),
        Duration::from_secs(3),
    );

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    assert_eq!(simulator.run(shutdown_rx, Some(3)).await, 0);
    assert_eq!(time_provider.sleeps(), 3);
}

#[tokio::test]
async fn tick_reports_backend_errors() {
    let simulator = Simulator::new(
        zones(),
        set_fixed_source(UpdateRequest::new(1, 40., 80., 6.4)),
        set_backend_down(),
        Arc::new(MockTimeProvider::new(0)),
        Duration::from_secs(3),
    );
    assert!(matches!(simulator.tick().await, Err(AppError::Backend(503))));
}

#[tokio::test]
async fn source_errors_skip_the_post() {
    let mut source = MockReadingSource::new();
    source.expect_next_reading().times(2).returning(|_| Err(AppError::Entropy("no entropy".to_owned())));
    let posted = Arc::new(Mutex::new(Vec::new()));
    let simulator = Simulator::new(
        zones(),
        Arc::new(source),
        set_backend_recording(posted.clone()),
        Arc::new(MockTimeProvider::new(0)),
        Duration::from_secs(3),
    );

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    assert_eq!(simulator.run(shutdown_rx, Some(2)).await, 0);
    assert!(posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let posted = Arc::new(Mutex::new(Vec::new()));
    let simulator = Simulator::new(
        zones(),
        Arc::new(RandomReadings),
        set_backend_recording(posted.clone()),
        Arc::new(MockTimeProvider::new(0)),
        Duration::from_secs(3),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();
    assert_eq!(simulator.run(shutdown_rx, None).await, 0);
    assert!(posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn keeps_ticking_when_shutdown_sender_is_gone() {
    let posted = Arc::new(Mutex::new(Vec::new()));
    let time_provider = Arc::new(MockTimeProvider::new(0));
    let simulator = Simulator::new(
        zones(),
        Arc::new(RandomReadings),
        set_backend_recording(posted.clone()),
        time_provider.clone(),
        Duration::from_secs(3),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    drop(shutdown_tx);
    assert_eq!(simulator.run(shutdown_rx, Some(5)).await, 5);
    assert_eq!(posted.lock().unwrap().len(), 5);
    assert_eq!(time_provider.sleeps(), 5);
}

#[tokio::test]
async fn real_clock_loop_ends_on_shutdown() {
    let posted = Arc::new(Mutex::new(Vec::new()));
    let simulator = Arc::new(Simulator::new(
        zones(),
        Arc::new(RandomReadings),
        set_backend_recording(posted.clone()),
        Arc::new(pulse::time::RealTimeProvider),
        Duration::from_secs(3600),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = {
        let simulator = simulator.clone();
        tokio::spawn(async move { simulator.run(shutdown_rx, None).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();

    let sent = tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    assert_eq!(sent, 0);
}
