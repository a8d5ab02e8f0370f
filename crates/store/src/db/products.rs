//! Product repository, including the product/promotion join table.

use sqlx::PgPool;

use storefront_core::{CollectionId, ProductId, PromotionId, Slug, UnitPrice};

use super::RepositoryError;
use crate::models::{NewProduct, Product, Promotion};

const PRODUCT_COLUMNS: &str = "id, collection_id, title, slug, description, unit_price, inventory, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product in an existing collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the title does not fit.
    /// Returns `RepositoryError::MissingReference` if the collection doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        input.validate()?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO store.products (collection_id, title, slug, description, unit_price, inventory)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(input.collection_id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.unit_price)
        .bind(input.inventory)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        tracing::debug!(product_id = %product.id, slug = %product.slug, "Created product");
        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored value fails validation.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Get products by slug. Slugs are indexed but not unique.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Vec<Product>, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE slug = $1 ORDER BY id"
        ))
        .bind(slug)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// List the products of a collection ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_collection(
        &self,
        collection_id: CollectionId,
    ) -> Result<Vec<Product>, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE collection_id = $1 ORDER BY title, id"
        ))
        .bind(collection_id)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Change a product's price.
    ///
    /// Existing cart and order lines keep the price they captured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_price(
        &self,
        id: ProductId,
        unit_price: UnitPrice,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE store.products SET unit_price = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(unit_price)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        tracing::info!(product_id = %id, unit_price = %unit_price, "Updated product price");
        Ok(product)
    }

    /// Set a product's inventory count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_inventory(
        &self,
        id: ProductId,
        inventory: i32,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE store.products SET inventory = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(inventory)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)
    }

    /// Attach a promotion to a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if a link was created, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if either row doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_promotion(
        &self,
        id: ProductId,
        promotion_id: PromotionId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO store.product_promotions (product_id, promotion_id)
            VALUES ($1, $2)
            ON CONFLICT (product_id, promotion_id) DO NOTHING
            ",
        )
        .bind(id)
        .bind(promotion_id)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        Ok(result.rows_affected() > 0)
    }

    /// Detach a promotion from a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if a link was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_promotion(
        &self,
        id: ProductId,
        promotion_id: PromotionId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM store.product_promotions WHERE product_id = $1 AND promotion_id = $2",
        )
        .bind(id)
        .bind(promotion_id)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }

    /// List the promotions attached to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn promotions(&self, id: ProductId) -> Result<Vec<Promotion>, RepositoryError> {
        sqlx::query_as::<_, Promotion>(
            r"
            SELECT p.id, p.description, p.discount
            FROM store.promotions p
            JOIN store.product_promotions pp ON pp.promotion_id = p.id
            WHERE pp.product_id = $1
            ORDER BY p.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Delete a product.
    ///
    /// Cart lines and promotion links go with it; a collection featuring it
    /// loses its featured product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` while any order item references the product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
