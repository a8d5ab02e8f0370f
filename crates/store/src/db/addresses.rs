//! Address repository. A customer has at most one address, keyed by their ID.

use sqlx::PgPool;

use storefront_core::CustomerId;

use super::RepositoryError;
use crate::models::{Address, NewAddress};

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Set the customer's address, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if a field does not fit.
    /// Returns `RepositoryError::MissingReference` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert(
        &self,
        customer_id: CustomerId,
        input: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        input.validate()?;

        sqlx::query_as::<_, Address>(
            r"
            INSERT INTO store.addresses (customer_id, street, city, zip)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (customer_id) DO UPDATE
                SET street = EXCLUDED.street,
                    city = EXCLUDED.city,
                    zip = EXCLUDED.zip
            RETURNING customer_id, street, city, zip
            ",
        )
        .bind(customer_id)
        .bind(&input.street)
        .bind(&input.city)
        .bind(input.zip_column()?)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)
    }

    /// Get a customer's address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored zip is negative.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, customer_id: CustomerId) -> Result<Option<Address>, RepositoryError> {
        sqlx::query_as::<_, Address>(
            "SELECT customer_id, street, city, zip FROM store.addresses WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Delete a customer's address.
    ///
    /// # Returns
    ///
    /// Returns `true` if an address was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, customer_id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.addresses WHERE customer_id = $1")
            .bind(customer_id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
