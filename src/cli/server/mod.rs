//! Server command - HTTP trigger surface and scheduled passes

use std::sync::Arc;

use axum::Router;
use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use super::{bootstrap, GlobalArgs};
use crate::api::{create_router, AppState};
use crate::infrastructure::observability::{create_metrics_router, init_metrics, PrometheusMetrics};
use crate::infrastructure::scheduler::{parse_schedule, CronScheduler};
use crate::infrastructure::services::SyncService;

#[derive(Args, Clone, Debug)]
pub struct ServerArgs {
    /// Address to listen on (defaults to server.host:server.port)
    #[arg(long)]
    pub listen_address: Option<String>,
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(global: &GlobalArgs, args: ServerArgs) -> anyhow::Result<()> {
    let config = bootstrap(global)?;
    let service = Arc::new(SyncService::from_config(&config)?);
    let metrics = init_metrics(&config.metrics);

    let scheduler = if config.sync.enabled {
        let schedule = parse_schedule(&config.sync.schedule)?;
        info!(schedule = %config.sync.schedule, "Starting sync scheduler");
        Some(CronScheduler::new(schedule, service.clone()).spawn())
    } else {
        info!("Scheduled sync disabled");
        None
    };

    let app = build_router(AppState::new(service), metrics, &config.metrics.path);

    let addr = args
        .listen_address
        .unwrap_or_else(|| config.listen_address());
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = scheduler {
        handle.abort();
    }

    info!("Server shutdown complete");

    Ok(())
}

fn build_router(state: AppState, metrics: Option<PrometheusMetrics>, metrics_path: &str) -> Router {
    let router = create_router(state);

    match metrics {
        Some(m) => router.merge(create_metrics_router(m, metrics_path)),
        None => router,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
