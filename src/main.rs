use internship_api::build_router;
use internship_api::config::app_config::{initialize_app_state, AppConfig};
use internship_api::db::repo::auth_repository;
use internship_api::observability::logs::init_logging;
use internship_api::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

const REVOCATION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(config.environment);

    let server_addr: SocketAddr = match config.server_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid server address {}: {}", config.server_address(), e);
            std::process::exit(1);
        }
    };
    info!(environment = %config.environment, "Starting internship API");

    let state = match initialize_app_state(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(purge_revoked_tokens(state.clone()));

    let app = build_router(state);
    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", server_addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", server_addr);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
    info!("Server stopped");
}

/// Periodically drops revocation rows whose token has expired anyway.
async fn purge_revoked_tokens(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(REVOCATION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        match auth_repository::purge_expired_revocations(&state.pg_pool).await {
            Ok(0) => {}
            Ok(purged) => info!(purged, "Purged expired token revocations"),
            Err(e) => error!("Error purging token revocations: {:?}", e),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
