//! Core library for the uptime monitor: tick intake, site probing and report delivery.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod monitor;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::create_routes;
pub use jobs::{CompletionSender, MonitorJob, MonitorQueue};
pub use models::{IntegrationDescriptor, MonitorPayload, Report, Setting};
pub use monitor::{
    probe_site, DispatchOutcome, MonitorPipeline, ProbeFailure, ProbeOutcome, ReportDispatcher,
    ResultAggregator, SiteProber,
};

use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub config: Arc<AppConfig>,
    pub monitor_queue: MonitorQueue,
    pub descriptor: Arc<IntegrationDescriptor>,
}

impl AppState {
    /// Must be called inside a Tokio runtime: the queue processor is spawned here.
    pub fn new(config: AppConfig) -> Result<Self> {
        let pipeline = Arc::new(MonitorPipeline::from_config(&config)?);
        Ok(Self::with_queue(config, MonitorQueue::new(pipeline)))
    }

    pub fn with_queue(config: AppConfig, monitor_queue: MonitorQueue) -> Self {
        let descriptor = IntegrationDescriptor::from_config(&config.integration);

        Self {
            app_name: config.integration.app_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: Arc::new(config),
            monitor_queue,
            descriptor: Arc::new(descriptor),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = middleware::cors::cors_layer_from_config(&state.config.cors);

    let router = Router::new()
        .merge(create_routes())
        .layer(cors)
        .with_state(state);

    middleware::logging::with_request_logging(router)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
