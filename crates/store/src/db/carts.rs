//! Cart repository.

use sqlx::PgPool;

use storefront_core::{CartId, CartItemId, CustomerId, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Return the customer's cart, creating it if they have none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn get_or_create(&self, customer_id: CustomerId) -> Result<Cart, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO store.carts (customer_id)
            VALUES ($1)
            ON CONFLICT (customer_id) DO UPDATE SET customer_id = EXCLUDED.customer_id
            RETURNING id, customer_id, created_at
            ",
        )
        .bind(customer_id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)
    }

    /// Get a customer's cart, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Cart>, RepositoryError> {
        sqlx::query_as::<_, Cart>(
            "SELECT id, customer_id, created_at FROM store.carts WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Add a product to a cart at its current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the cart or product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r"
            INSERT INTO store.cart_items (cart_id, product_id, quantity, unit_price)
            SELECT $1, p.id, $3, p.unit_price
            FROM store.products p
            WHERE p.id = $2
            RETURNING id, cart_id, product_id, quantity, unit_price
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_write)?
        .ok_or_else(|| RepositoryError::MissingReference(format!("product {product_id}")))?;

        tracing::debug!(cart_id = %cart_id, product_id = %product_id, "Added cart item");
        Ok(item)
    }

    /// Change the quantity of a cart item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_quantity(
        &self,
        item_id: CartItemId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        sqlx::query_as::<_, CartItem>(
            r"
            UPDATE store.cart_items
            SET quantity = $2
            WHERE id = $1
            RETURNING id, cart_id, product_id, quantity, unit_price
            ",
        )
        .bind(item_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)
    }

    /// Remove an item from its cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(&self, item_id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.cart_items WHERE id = $1")
            .bind(item_id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }

    /// List the items of a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        sqlx::query_as::<_, CartItem>(
            r"
            SELECT id, cart_id, product_id, quantity, unit_price
            FROM store.cart_items
            WHERE cart_id = $1
            ORDER BY id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Delete a cart and its items.
    ///
    /// # Returns
    ///
    /// Returns `true` if the cart was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, cart_id: CartId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.carts WHERE id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
