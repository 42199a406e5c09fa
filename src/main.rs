use movie_review_api::api::{self, AppState, AuthGuard};
use movie_review_api::config::AppConfig;
use movie_review_api::storage::JsonFileStorage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("🚀 Starting Movie Review API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Data File: {}", config.storage.data_path.display());
    info!("   - Admins: {}", config.auth.admin_ids.len());
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    if config.auth.api_key.is_none() {
        warn!("⚠️  API_KEY is not set, every authenticated request will be rejected");
    }

    // Initialize review storage
    info!("💾 Initializing review storage...");
    let storage = JsonFileStorage::new(&config.storage.data_path);
    storage.ensure_file().await?;
    let review_count = storage.try_read_all().await.map(|r| r.len());
    match review_count {
        Ok(count) => info!("✅ Review storage ready ({} reviews)", count),
        Err(e) => warn!("⚠️  Review file is unreadable, it will be served as empty: {}", e),
    }

    // Create application state
    let state = AppState::new(storage, AuthGuard::new(&config.auth));
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /                 - Liveness");
    info!("   GET    /api/movies       - List reviews");
    info!("   POST   /api/movies       - Create review");
    info!("   PUT    /api/movies/:id   - Update review");
    info!("   DELETE /api/movies/:id   - Delete review");
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
