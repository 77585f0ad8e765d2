//! Action-Log Server — telemetry ingestion and batched persistence.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use actionlog_core::config::AppConfig;
use actionlog_core::error::AppError;
use actionlog_core::traits::BatchSink;
use actionlog_entity::action::NewActionLogBatch;

#[tokio::main]
async fn main() {
    let env = std::env::var("ACTIONLOG_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
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
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting action-log server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = actionlog_database::connection::DatabasePool::connect(&config.database).await?;

    actionlog_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let batch_repo = Arc::new(
        actionlog_database::repositories::action_log::ActionLogBatchRepository::new(
            db.pool().clone(),
        ),
    );

    // ── Step 3: Pipeline components ──────────────────────────────
    let buffer = Arc::new(actionlog_service::buffer::ActionLogBuffer::new());
    let ingest = Arc::new(actionlog_service::ingest::IngestService::new(
        Arc::clone(&buffer),
        &config.ingest,
    ));
    let pipeline = Arc::new(actionlog_worker::flush::FlushPipeline::new(
        Arc::clone(&buffer),
        Arc::clone(&batch_repo) as Arc<dyn BatchSink<NewActionLogBatch>>,
    ));

    // ── Step 4: Shutdown channel + flush scheduler ───────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = actionlog_worker::scheduler::FlushScheduler::new(
        Arc::clone(&pipeline),
        config.flush.clone(),
    );
    let tier_handles = scheduler.spawn(shutdown_rx.clone());

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app_state = actionlog_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db.pool().clone(),
        buffer: Arc::clone(&buffer),
        ingest: Arc::clone(&ingest),
        batch_repo: Arc::clone(&batch_repo),
    };

    let app = actionlog_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Action-log server listening on {}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 6: Stop tiers and flush what is left ────────────────
    tracing::info!("Waiting for flush tiers to stop...");
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    for handle in tier_handles {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    // Best effort: the buffer is volatile, so drain whatever made it
    // in before the listener closed.
    let flushed = pipeline.flush_all().await;
    if flushed > 0 {
        tracing::info!(rows = flushed, "Final flush complete");
    }

    db.close().await;
    tracing::info!("Action-log server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
