use pulse::api::{run_web_server, AppState};
use pulse::config::{run_options::get_args, Config};
use pulse::time::RealTimeProvider;
use pulse::utils::start_log;
use std::{error::Error, net::SocketAddr};
use tokio::{signal, sync::watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    start_log::<RealTimeProvider>(None);

    info!("Starting PrecisionPulse backend...");
    let cfg = Config::load(&get_args())?;
    let addr: SocketAddr = cfg.web_server.address.parse()?;
    let app_state = AppState::from_config(&cfg);
    info!(sensors = app_state.store.len(), "Sensor store seeded.");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested.");
                _ = shutdown_tx.send(true);
            }
            Err(e) => warn!(error = %e, "Unable to listen for Ctrl-C."),
        }
    });

    run_web_server(app_state, addr, cfg.web_server.static_dir.clone(), shutdown_rx).await?;
    Ok(())
}
