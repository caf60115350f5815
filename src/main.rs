//! SocialHub notification server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use socialhub_api::state::AppState;
use socialhub_core::config::AppConfig;
use socialhub_core::error::AppError;
use socialhub_database::connection::DatabasePool;
use socialhub_database::repositories::{
    PgNotificationRepository, PgPreferenceRepository, PgUserRepository,
};
use socialhub_realtime::connection::manager::ConnectionManager;
use socialhub_realtime::connection::registry::ConnectionRegistry;
use socialhub_realtime::dispatcher::FanoutDispatcher;
use socialhub_service::notification::producers::EventProducers;
use socialhub_service::notification::service::NotificationService;
use socialhub_service::preference::service::PreferenceService;

#[tokio::main]
async fn main() {
    let env = std::env::var("SOCIALHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SocialHub v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // Database connection + migrations
    let db = DatabasePool::connect(&config.database).await?;
    socialhub_database::migration::run_migrations(db.pool()).await?;

    // Repositories
    let notification_repo = Arc::new(PgNotificationRepository::new(db.pool().clone()));
    let preference_repo = Arc::new(PgPreferenceRepository::new(db.pool().clone()));
    let user_repo = Arc::new(PgUserRepository::new(db.pool().clone()));

    // Realtime layer
    let registry = Arc::new(ConnectionRegistry::new());
    let connections = Arc::new(ConnectionManager::new(
        registry,
        notification_repo.clone(),
        config.realtime.clone(),
    ));

    // Services
    let preferences = Arc::new(PreferenceService::new(preference_repo));
    let dispatcher = Arc::new(FanoutDispatcher::new(
        connections.clone(),
        preferences.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(notification_repo, dispatcher));
    let producers = Arc::new(EventProducers::new(notifications.clone(), user_repo.clone()));

    let state = AppState {
        config: config.clone(),
        notifications,
        preferences,
        producers,
        users: user_repo,
        connections,
    };

    let router = socialhub_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
