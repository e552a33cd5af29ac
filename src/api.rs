use crate::{
    alerts::Alert,
    broadcast::{BroadcastMessage, Broadcaster},
    config::Config,
    error::AppError,
    sensors::{
        ds::{SensorReading, UpdateRequest},
        interface::{SENSORS_PATH, UPDATE_PATH},
        store::SensorStore,
    },
};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::sync::{
    broadcast::{error::RecvError, Receiver},
    watch,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::{debug, info, warn};

pub const UPDATED_BODY: &str = "Updated";
pub const WS_PATH: &str = "/ws";

const GRACEFUL_SHUTDOWN_SECS: u64 = 5;

#[derive(Debug)]
pub struct AppState {
    pub store: SensorStore,
    pub broadcaster: Broadcaster,
}

impl AppState {
    pub fn new(store: SensorStore, broadcaster: Broadcaster) -> Arc<Self> {
        Arc::new(Self { store, broadcaster })
    }

    pub fn from_config(cfg: &Config) -> Arc<Self> {
        Self::new(SensorStore::new(cfg.sensors.clone()), Broadcaster::new(cfg.broadcast.capacity))
    }

    /// Stores the update, derives the alert from the new moisture and publishes both, all under the sensor's lock.
    pub async fn record_update(&self, update: &UpdateRequest) -> Result<(SensorReading, Option<Alert>), AppError> {
        self.store
            .apply_update_with(update, |reading| {
                let alert = Alert::evaluate(reading);
                self.broadcaster.publish(BroadcastMessage::SensorUpdate(reading.clone()));
                if let Some(alert) = &alert {
                    self.broadcaster.publish(BroadcastMessage::Alert(alert.clone()));
                }
                (reading.clone(), alert)
            })
            .await
    }
}

pub async fn get_sensors(State(app_state): State<Arc<AppState>>) -> Json<Vec<SensorReading>> {
    Json(app_state.store.get_all().await)
}

pub async fn update_sensor(
    State(app_state): State<Arc<AppState>>, Json(update): Json<UpdateRequest>,
) -> Result<&'static str, AppError> {
    let (reading, alert) = app_state.record_update(&update).await.inspect_err(|e| {
        warn!(sensor_id = update.id, error = %e, "Update rejected.");
    })?;
    info!("[UPDATE] {}: {}% Moisture", reading.name, reading.moisture);
    if let Some(alert) = alert {
        debug!(level = ?alert.level, text = %alert.text, "Alert raised.");
    }
    Ok(UPDATED_BODY)
}

// subscribe before the upgrade so nothing published after the handshake is missed
pub async fn ws_feed(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    let rx = app_state.broadcaster.subscribe();
    ws.on_upgrade(move |socket| forward_broadcasts(socket, rx))
}

async fn forward_broadcasts(mut socket: WebSocket, mut rx: Receiver<BroadcastMessage>) {
    info!("Broadcast listener connected.");
    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Ok(msg) => {
                    let json = match serde_json::to_string(&msg) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!(error = %e, "Failed to serialize broadcast message.");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => warn!(missed, "Broadcast listener lagging, messages dropped."),
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {} // listeners have nothing to say
            },
        }
    }
    info!("Broadcast listener disconnected.");
}

pub fn router(app_state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route(SENSORS_PATH, get(get_sensors))
        .route(UPDATE_PATH, post(update_sensor))
        .route(WS_PATH, get(ws_feed))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(app_state);

    match static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving dashboard assets.");
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    }
}

pub async fn run_web_server(
    app_state: Arc<AppState>, addr: SocketAddr, static_dir: Option<PathBuf>, mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let app = router(app_state, static_dir.as_deref());

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            if shutdown_rx.changed().await.is_err() {
                // sender gone, nobody can ask us to stop anymore
                return;
            }
        }
        info!("Stopping HTTP server.");
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(GRACEFUL_SHUTDOWN_SECS)));
    });

    info!("PrecisionPulse backend running on http://{}", addr);
    axum_server::bind(addr).handle(handle).serve(app.into_make_service()).await?;
    Ok(())
}
