//! Collection repository.

use sqlx::PgPool;

use storefront_core::{CollectionId, ProductId};

use super::RepositoryError;
use crate::models::{Collection, NewCollection};

/// Repository for collection database operations.
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a collection with no featured product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the title does not fit.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewCollection) -> Result<Collection, RepositoryError> {
        input.validate()?;

        let collection = sqlx::query_as::<_, Collection>(
            r"
            INSERT INTO store.collections (title)
            VALUES ($1)
            RETURNING id, title, featured_product_id
            ",
        )
        .bind(&input.title)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        tracing::debug!(collection_id = %collection.id, "Created collection");
        Ok(collection)
    }

    /// Get a collection by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CollectionId) -> Result<Option<Collection>, RepositoryError> {
        sqlx::query_as::<_, Collection>(
            r"
            SELECT id, title, featured_product_id
            FROM store.collections
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// List all collections ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Collection>, RepositoryError> {
        sqlx::query_as::<_, Collection>(
            r"
            SELECT id, title, featured_product_id
            FROM store.collections
            ORDER BY title, id
            ",
        )
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Set or clear the featured product.
    ///
    /// The featured product does not have to belong to the collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the collection doesn't exist.
    /// Returns `RepositoryError::MissingReference` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_featured_product(
        &self,
        id: CollectionId,
        product_id: Option<ProductId>,
    ) -> Result<Collection, RepositoryError> {
        sqlx::query_as::<_, Collection>(
            r"
            UPDATE store.collections
            SET featured_product_id = $2
            WHERE id = $1
            RETURNING id, title, featured_product_id
            ",
        )
        .bind(id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)
    }

    /// Count products in a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: CollectionId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM store.products WHERE collection_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await
                .map_err(RepositoryError::on_read)?;

        Ok(count)
    }

    /// Delete a collection.
    ///
    /// # Returns
    ///
    /// Returns `true` if the collection was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` while any product belongs to the collection.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CollectionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.collections WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
