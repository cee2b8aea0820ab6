//! Server lifecycle: building shared state, wiring the actix application,
//! running the HTTP server, and coordinating graceful shutdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use paysql_auth::JwtSettings;
use paysql_billing::{InMemoryLedger, Ledger, SqliteLedger};
use paysql_configs::{defaults::resolved_workers, BillingSettings, LedgerBackend, ServerConfig};
use paysql_core::AppContext;
use paysql_store::{seed_sample_dataset, SharedStore, SqliteStore, SqliteStoreOptions};

use crate::middleware;

/// Open the ledger selected by `billing.ledger_backend`.
pub fn open_ledger(settings: &BillingSettings) -> Result<Arc<dyn Ledger>> {
    match settings.backend() {
        Some(LedgerBackend::Memory) => {
            warn!("Using in-memory ledger: balances are lost on restart");
            Ok(Arc::new(InMemoryLedger::new()))
        },
        Some(LedgerBackend::Sqlite) => {
            ensure_parent_dir(&settings.ledger_path)?;
            let ledger = SqliteLedger::open(&settings.ledger_path)
                .with_context(|| format!("Failed to open ledger at {}", settings.ledger_path))?;
            info!("Ledger: sqlite ({})", settings.ledger_path);
            Ok(Arc::new(ledger))
        },
        None => Err(anyhow::anyhow!("Unknown ledger backend '{}'", settings.ledger_backend)),
    }
}

/// Open the shared dataset, seeding the sample table first when configured.
pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn SharedStore>> {
    let storage = &config.storage;

    if storage.seed_sample_data {
        ensure_parent_dir(&storage.dataset_path)?;
        let inserted = seed_sample_dataset(&storage.dataset_path)
            .with_context(|| format!("Failed to seed dataset at {}", storage.dataset_path))?;
        debug!("Seeded {} sample rows", inserted);
    }

    let store = SqliteStore::open(
        &storage.dataset_path,
        SqliteStoreOptions {
            pool_size: storage.pool_size,
            query_timeout: Duration::from_millis(storage.query_timeout_ms),
        },
    )
    .with_context(|| format!("Failed to open shared dataset at {}", storage.dataset_path))?;

    Ok(Arc::new(store))
}

/// Build the application state.
pub async fn bootstrap(config: &ServerConfig) -> Result<Arc<AppContext>> {
    let ledger = open_ledger(&config.billing)?;
    let store = open_store(config)?;

    info!(
        "Query fee: {} (engine errors {})",
        config.billing.query_fee,
        if config.security.expose_engine_errors {
            "exposed"
        } else {
            "hidden"
        }
    );

    Ok(Arc::new(AppContext::new(Arc::new(config.clone()), ledger, store)))
}

/// Register app data and routes. Shared by the server and integration tests.
pub fn configure_app(cfg: &mut web::ServiceConfig, app_context: &Arc<AppContext>) {
    let config = app_context.config();
    cfg.app_data(web::Data::new(Arc::clone(app_context)))
        .app_data(web::Data::new(JwtSettings::from(&config.auth)))
        .app_data(web::PayloadConfig::new(config.security.max_request_body_size))
        .configure(paysql_api::configure_routes);
}

/// Start the HTTP server and run until Ctrl+C.
pub async fn run(config: &ServerConfig, app_context: Arc<AppContext>) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let workers = resolved_workers(config.server.workers);
    info!("Starting HTTP server on {} ({} workers)", bind_addr, workers);
    debug!("Endpoints: POST /query/shared, GET /healthcheck");

    let cors_config = config.clone();
    let app_context_for_handler = Arc::clone(&app_context);

    let server = HttpServer::new(move || {
        let app_context = app_context_for_handler.clone();
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .configure(|cfg| configure_app(cfg, &app_context))
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .workers(workers)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(Err(e)) => log::error!("Server error: {}", e),
                Err(e) => log::error!("Server task failed: {}", e),
                Ok(Ok(())) => {},
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
            server_handle.stop(true).await;
            drop(app_context);
            debug!("Graceful shutdown complete");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
