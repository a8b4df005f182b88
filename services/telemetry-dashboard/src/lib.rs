//! Telemetry Dashboard - live sensor readings with alert thresholds
//!
//! Polls a telemetry source, renders the latest reading with its warning
//! flags, and keeps the displayed thresholds in sync with the settings store.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod poller;
pub mod renderer;
pub mod settings;
pub mod status;
pub mod telemetry_client;
pub mod types;
pub mod view;

pub use app::Dashboard;
pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;

/// Run the dashboard until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> =
        Arc::new(ReqwestHttpClient::new(config.telemetry.request_timeout())?);
    let dashboard = Arc::new(Dashboard::new(&config, http)?);
    let cancel = CancellationToken::new();

    // The page used to render thresholds server-side; seed them once here
    if let Err(e) = dashboard.settings().refresh_labels().await {
        tracing::warn!("Could not load initial thresholds: {}", e);
    }

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let router = dashboard::build_router(Arc::clone(&dashboard));
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };
            tracing::info!("Dashboard listening on http://{}", addr);

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    dashboard.poller().start().await;
    tracing::info!(
        "Telemetry dashboard polling {} every {:?}",
        config.telemetry.base_url,
        dashboard.poller().interval()
    );

    cancel.cancelled().await;

    dashboard.poller().stop().await;
    tracing::info!("Telemetry dashboard stopped");

    Ok(())
}
