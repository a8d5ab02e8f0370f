//! Promotion repository.

use sqlx::PgPool;

use storefront_core::PromotionId;

use super::RepositoryError;
use crate::models::{NewPromotion, Promotion};

/// Repository for promotion database operations.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a non-finite discount.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewPromotion) -> Result<Promotion, RepositoryError> {
        input.validate()?;

        let promotion = sqlx::query_as::<_, Promotion>(
            r"
            INSERT INTO store.promotions (description, discount)
            VALUES ($1, $2)
            RETURNING id, description, discount
            ",
        )
        .bind(&input.description)
        .bind(input.discount)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        tracing::debug!(promotion_id = %promotion.id, "Created promotion");
        Ok(promotion)
    }

    /// Get a promotion by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PromotionId) -> Result<Option<Promotion>, RepositoryError> {
        sqlx::query_as::<_, Promotion>(
            r"
            SELECT id, description, discount
            FROM store.promotions
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// List all promotions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Promotion>, RepositoryError> {
        sqlx::query_as::<_, Promotion>(
            r"
            SELECT id, description, discount
            FROM store.promotions
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Delete a promotion. Products keep existing; only their links are removed.
    ///
    /// # Returns
    ///
    /// Returns `true` if the promotion was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: PromotionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.promotions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
