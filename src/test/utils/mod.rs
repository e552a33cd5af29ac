pub mod mock_backend;
pub mod mock_time;

use crate::{
    api::AppState,
    broadcast::Broadcaster,
    config::Config,
    sensors::{default_sensors, store::SensorStore},
};
use std::{
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    time::Duration,
};

pub fn mock_cfg() -> Config {
    let mut cfg = Config::default();
    cfg.web_server.address = "127.0.0.1:0".to_owned();
    cfg.simulator.interval_secs = 1;
    cfg.dashboard.interval_secs = 1;
    cfg
}

/// The three factory zones and a broadcaster with room for `capacity` messages.
pub fn set_app_state(capacity: usize) -> Arc<AppState> {
    AppState::new(SensorStore::new(default_sensors()), Broadcaster::new(capacity))
}

/// A loopback address nobody is listening on right now.
pub fn free_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind an ephemeral port");
    listener.local_addr().expect("ephemeral port address")
}

pub async fn wait_for_server(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server on {addr} did not come up");
}
