//! Service startup: device list, store, handlers and listener.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use fleetwatch_store::AggregationStore;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::devices::load_device_ids;
use crate::handlers::Handlers;
use crate::server::Server;

/// Load the device list and serve until `shutdown` completes.
pub async fn run<F>(settings: Settings, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let device_ids = match load_device_ids(&settings.devices_csv) {
        Ok(ids) => ids,
        Err(e) => {
            error!(
                file = %settings.devices_csv.display(),
                error = %format!("{:#}", e),
                "failed to load devices from CSV"
            );
            return Err(e);
        }
    };
    info!(
        file = %settings.devices_csv.display(),
        count = device_ids.len(),
        "loaded devices from CSV"
    );

    let store = Arc::new(AggregationStore::new(device_ids));
    let handlers = Arc::new(
        Handlers::new(store).with_metrics_namespace(settings.metrics_namespace.clone()),
    );

    let server = Server::bind(settings.listen_addr()?).await?;
    info!(port = settings.port, address = %server.local_addr(), "starting server");

    server.serve(handlers, shutdown).await?;
    info!("server stopped");
    Ok(())
}

/// Completes on Ctrl-C, or never if the signal cannot be watched.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
