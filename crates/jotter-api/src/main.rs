//! jotter-api - HTTP API server for jotter

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jotter_api::{build_router, AppState, NoteService, ServerConfig, StaticTokenResolver, StoreBackend};
use jotter_core::{IdentityResolver, NoteStore, SystemClock};
use jotter_db::{log_pool_metrics, Database, InMemoryNoteRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = ServerConfig::from_env();

    let static_tokens = match config.static_tokens.as_deref() {
        Some(spec) => Some(StaticTokenResolver::parse(spec)?),
        None => None,
    };

    let (store, identity): (Arc<dyn NoteStore>, Arc<dyn IdentityResolver>) =
        match config.store_backend {
            StoreBackend::Postgres => {
                let db = Database::connect(&config.database_url, config.db_max_connections).await?;
                db.migrate().await?;
                info!(subsystem = "db", op = "migrate", "Migrations applied");
                let purged = db.sessions.purge_expired().await?;
                info!(
                    subsystem = "auth",
                    op = "purge_expired",
                    result_count = purged,
                    "Removed stale sessions"
                );
                log_pool_metrics(db.pool());

                let identity: Arc<dyn IdentityResolver> = match static_tokens {
                    Some(tokens) => {
                        warn!("AUTH_STATIC_TOKENS set; session table is not consulted");
                        Arc::new(tokens)
                    }
                    None => Arc::new(db.sessions),
                };
                (Arc::new(db.notes), identity)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory note store; notes are lost on restart");
                let tokens = static_tokens.unwrap_or_default();
                if tokens.is_empty() {
                    warn!("No AUTH_STATIC_TOKENS configured; every note route will return 401");
                }
                (Arc::new(InMemoryNoteRepository::new()), Arc::new(tokens))
            }
        };

    info!(
        store_backend = ?config.store_backend,
        allowed_origins = %config.allowed_origins,
        body_limit_bytes = config.request_body_limit_bytes,
        "Configuration loaded"
    );

    let notes = NoteService::new(store, Arc::new(SystemClock));
    let app = build_router(AppState::new(notes, identity), &config);

    // Start server
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber.
///
/// `LOG_FORMAT` selects `json` or `text`, `LOG_FILE` adds a daily rolling
/// file, `LOG_ANSI` forces colors on or off, and `RUST_LOG` sets the filter.
/// The returned guard flushes the file writer on drop.
fn init_tracing() -> Option<WorkerGuard> {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    let ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");
    let log_file = std::env::var("LOG_FILE").ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jotter_api=debug,jotter_db=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    let guard = match log_file.as_deref().map(std::path::Path::new) {
        Some(path) => {
            let dir = path.parent().unwrap_or(std::path::Path::new("."));
            let name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("jotter-api.log");
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi.unwrap_or(false));
            if json {
                registry.with(layer.json()).init();
            } else {
                registry.with(layer).init();
            }
            Some(guard)
        }
        None => {
            let layer = tracing_subscriber::fmt::layer().with_ansi(ansi.unwrap_or(true));
            if json {
                registry.with(layer.json()).init();
            } else {
                registry.with(layer).init();
            }
            None
        }
    };

    info!(
        json,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
