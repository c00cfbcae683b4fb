// File: services/frontdesk_backend/src/main.rs
use std::sync::Arc;

use frontdesk_backend::app_state::AppState;
use frontdesk_backend::build_router;
use frontdesk_backend::service_factory::FrontdeskServiceFactory;
use frontdesk_common::logging;
use frontdesk_config::load_config;
use tokio::net::TcpListener;
use tracing::{error, info};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("🚨 Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("🚨 Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    logging::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("🚨 Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration: {}", config.redacted_summary());

    let adapters = match FrontdeskServiceFactory::production(&config).await {
        Ok(adapters) => adapters,
        Err(e) => {
            error!("🚨 Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };
    let (state, refresher) = AppState::assemble(config.clone(), adapters).await;
    let app = build_router(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("🚨 Could not bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("🚨 Server error: {}", e);
    }

    if let Some(refresher) = refresher {
        refresher.stop().await;
    }
    info!("Server stopped");
}
