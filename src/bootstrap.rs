use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::chain::build_chain;
use crate::clients::{ContractingClient, LotsClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::runner::CeasefireRunner;
use crate::watcher::ContractsDbWatcher;

/// Builds the fully wired reconciliation runner.
pub async fn build_runner(config: &Config) -> AppResult<CeasefireRunner> {
    info!("Initializing reconciliation components ...");

    let pool = initialize_database(&config.database_url).await?;

    let contracting = Arc::new(ContractingClient::new(&config.contracting)?);
    let lots = Arc::new(LotsClient::new(&config.lots)?);
    info!(
        "🌐 Remote resource clients ready (contracting: {}, lots: {})",
        config.contracting.host, config.lots.host
    );

    let watcher = ContractsDbWatcher::new(pool, config.batch_limit);
    let chain = build_chain(contracting, lots);
    info!("✅ Reconciliation chain wired");

    Ok(CeasefireRunner::new(
        Box::new(watcher),
        chain,
        config.sleep_range,
    ))
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("📊 Connecting to the contracting database...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await?;

    // The contracts table belongs to the contracting service; this
    // process only reads it, so no migrations run here. A ping proves
    // the database answers before the loop starts.
    sqlx::query("SELECT 1").execute(&pool).await?;

    info!("✓ Database pool configured: 5 max connections");
    Ok(pool)
}
