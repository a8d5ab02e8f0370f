//! Database operations for the storefront `PostgreSQL` schema.
//!
//! # Schema: `store`
//!
//! ## Tables
//!
//! - `promotions` - Discounts, linked to products through `product_promotions`
//! - `collections` - Product groups with an optional featured product
//! - `products` - Catalog entries (price is `NUMERIC(6, 2)`)
//! - `product_promotions` - Join table for products and promotions
//! - `customers` - Customers (unique email, membership tier)
//! - `addresses` - One address per customer, keyed by `customer_id`
//! - `orders` / `order_items` - Placed orders with price snapshots
//! - `carts` / `cart_items` - One cart per customer with price snapshots
//!
//! # Migrations
//!
//! Migrations are stored in `crates/store/migrations/` and run via:
//! ```bash
//! cargo run -p storefront-cli -- migrate
//! ```

pub mod addresses;
pub mod carts;
pub mod collections;
pub mod customers;
pub mod orders;
pub mod products;
pub mod promotions;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use carts::CartRepository;
pub use collections::CollectionRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use promotions::PromotionRepository;

use crate::config::StoreConfig;
use crate::models::FieldError;

/// Embedded migrations from `crates/store/migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Delete rejected because other rows still reference the target.
    #[error("still referenced: {0}")]
    Protected(String),

    /// Insert or update points at a row that does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// Value rejected by a column constraint or input validation.
    #[error("invalid value: {0}")]
    Invalid(String),
}

impl From<FieldError> for RepositoryError {
    fn from(err: FieldError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Which kind of statement produced an error.
///
/// A foreign-key violation means "still referenced" for a delete and "points
/// at nothing" for an insert or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statement {
    Read,
    Write,
    Delete,
}

impl RepositoryError {
    /// Classify an error from a SELECT.
    pub(crate) fn on_read(err: sqlx::Error) -> Self {
        classify(err, Statement::Read)
    }

    /// Classify an error from an INSERT or UPDATE.
    pub(crate) fn on_write(err: sqlx::Error) -> Self {
        classify(err, Statement::Write)
    }

    /// Classify an error from a DELETE.
    pub(crate) fn on_delete(err: sqlx::Error) -> Self {
        classify(err, Statement::Delete)
    }
}

fn classify(err: sqlx::Error, statement: Statement) -> RepositoryError {
    match err {
        sqlx::Error::Database(ref db_err) => {
            let constraint = db_err.constraint().unwrap_or("unnamed constraint").to_owned();
            if db_err.is_unique_violation() {
                RepositoryError::Conflict(constraint)
            } else if db_err.is_foreign_key_violation() {
                if statement == Statement::Delete {
                    RepositoryError::Protected(constraint)
                } else {
                    RepositoryError::MissingReference(constraint)
                }
            } else if db_err.is_check_violation() {
                RepositoryError::Invalid(db_err.message().to_owned())
            } else {
                RepositoryError::Database(err)
            }
        }
        sqlx::Error::ColumnDecode { index, source } => {
            RepositoryError::DataCorruption(format!("column {index}: {source}"))
        }
        sqlx::Error::RowNotFound if statement != Statement::Read => RepositoryError::NotFound,
        other => RepositoryError::Database(other),
    }
}

/// Create a `PostgreSQL` connection pool from store configuration.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &StoreConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.database_url.expose_secret())
        .await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!(count = MIGRATOR.iter().count(), "Running store migrations");
    MIGRATOR.run(pool).await?;
    tracing::info!("Store migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_on_write_is_not_found() {
        assert!(matches!(
            RepositoryError::on_write(sqlx::Error::RowNotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn test_row_not_found_on_read_is_database_error() {
        assert!(matches!(
            RepositoryError::on_read(sqlx::Error::RowNotFound),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn test_decode_failure_is_data_corruption() {
        let err = sqlx::Error::ColumnDecode {
            index: "membership".to_string(),
            source: "invalid membership code: \"X\"".into(),
        };
        let classified = RepositoryError::on_read(err);
        assert!(matches!(classified, RepositoryError::DataCorruption(ref msg) if msg.contains("membership")));
    }

    #[test]
    fn test_field_error_becomes_invalid() {
        let err: RepositoryError = FieldError::new("title", "cannot be blank").into();
        assert_eq!(err.to_string(), "invalid value: title: cannot be blank");
    }

    #[test]
    fn test_migrations_are_embedded_in_order() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(versions.len(), 5);
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
