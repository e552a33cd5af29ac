use pulse::config::{run_options::get_args, Config};
use pulse::dashboard::DashboardClient;
use pulse::sensors::interface::HttpBackend;
use pulse::time::RealTimeProvider;
use pulse::utils::start_log;
use std::{error::Error, sync::Arc};
use tokio::{signal, sync::watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    start_log::<RealTimeProvider>(None);

    let cfg = Config::load(&get_args())?;
    let backend = Arc::new(HttpBackend::new(&cfg.dashboard.backend_url)?);
    let mut client =
        DashboardClient::new(backend, Arc::new(RealTimeProvider), cfg.dashboard.interval(), cfg.dashboard.auto_mode);

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

    info!("Polling {} every {:?}.", cfg.dashboard.backend_url, cfg.dashboard.interval());
    client.run(shutdown_rx, None, |view| println!("{view}")).await;
    Ok(())
}
