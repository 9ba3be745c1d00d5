//! farm service
//!
//! Connects to the farm database and continuously audits barn placement
//! against the balancing invariants until interrupted.

use anyhow::Result;
use farm_balance::PartitionService;
use farm_service::{audit::AuditWorker, config, db::Database};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to FARM_LOG_LEVEL)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        barn_capacity = %config.barn_capacity,
        audit_interval_secs = config.audit_interval.as_secs(),
        "Starting farm service"
    );

    let db = match Database::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            return Err(e.into());
        }
    };
    db.health_check().await?;

    // Run migrations in dev mode
    if config.dev_mode {
        info!("Running database migrations (dev mode)");
        if let Err(e) = db.run_migrations().await {
            error!(error = %e, "Failed to run migrations");
            return Err(e.into());
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let service = PartitionService::new(db.farm_store(), config.barn_capacity);
    let worker = AuditWorker::new(service, config.audit_interval);
    let audit_handle = tokio::spawn(async move {
        worker.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");
    let _ = shutdown_tx.send(true);

    let shutdown_timeout = std::time::Duration::from_secs(10);
    if let Err(e) = tokio::time::timeout(shutdown_timeout, audit_handle).await {
        warn!(error = %e, "Audit worker did not shut down in time");
    }

    info!("Farm service shutdown complete");
    Ok(())
}
