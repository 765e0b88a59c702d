mod api;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::{ensure_profile, JsonFileStore, MemoryStore, ProfileStore};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("🚀 Starting Portfolio API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Database: {}", config.storage.database);
    info!("   - Collection: {}", config.storage.collection);
    info!("   - Public dir: {:?}", config.static_files.public_dir);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Open the document store
    let store: Arc<dyn ProfileStore> = if config.storage.in_memory {
        info!("💾 Using in-memory document store (nothing is persisted)");
        Arc::new(MemoryStore::new())
    } else {
        info!("💾 Opening document store...");
        let store = JsonFileStore::new(&config.storage.data_path);
        let documents = store
            .initialize()
            .await
            .with_context(|| format!("Failed to open store at {:?}", store.path()))?;
        info!("✅ Document store ready ({} documents)", documents);
        Arc::new(store)
    };

    // Seed the profile on first start
    ensure_profile(store.as_ref(), config.seed.to_profile(Utc::now()))
        .await
        .context("Failed to initialize profile")?;

    // Create application state
    let state = AppState { store };

    // Build router with modular routes
    let app = api::router(state, &config.static_files);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                    - Home page");
    info!("   GET  /api/portfolio       - Fetch portfolio");
    info!("   POST /api/update-profile  - Update profile fields");
    info!("   POST /api/projects        - Add project");
    info!("   GET  /api/visitor-count   - Count a visit");
    info!("   GET  /api/health          - Health check");
    info!("   GET  /api/data            - Demo data");
    info!("   GET  /api/update          - Demo profile update");
    info!("");
    info!("✨ Server is ready to accept requests!");

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
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
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

    info!("🛑 Shutdown signal received");
}
