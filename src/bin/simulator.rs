use pulse::config::{run_options::get_args, Config};
use pulse::sensors::interface::HttpBackend;
use pulse::simulator::{RandomReadings, Simulator, Zone};
use pulse::time::RealTimeProvider;
use pulse::utils::start_log;
use std::{error::Error, sync::Arc};
use tokio::{signal, sync::watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    start_log::<RealTimeProvider>(None);

    let cfg = Config::load(&get_args())?;
    let zones: Vec<Zone> = cfg.sensors.iter().map(Zone::from).collect();
    let backend = Arc::new(HttpBackend::new(&cfg.simulator.backend_url)?);
    let simulator =
        Simulator::new(zones, Arc::new(RandomReadings), backend, Arc::new(RealTimeProvider), cfg.simulator.interval());

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

    simulator.run(shutdown_rx, None).await;
    Ok(())
}
