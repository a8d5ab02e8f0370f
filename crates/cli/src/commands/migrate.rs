//! Database migration command.
//!
//! Applies the migrations embedded in `storefront-store` (from
//! `crates/store/migrations/`) to the database named by `STORE_DATABASE_URL`.

use storefront_store::config::StoreConfig;
use storefront_store::db;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;

    tracing::info!("Connecting to store database...");
    let pool = db::create_pool(&config).await?;

    db::run_migrations(&pool).await?;

    pool.close().await;
    Ok(())
}
