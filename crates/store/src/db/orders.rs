//! Order repository.
//!
//! Order items copy the product's `unit_price` when the order is placed; the
//! copy is never updated (a trigger rejects changes), so later price changes
//! do not affect existing orders.

use sqlx::PgPool;

use storefront_core::{CustomerId, OrderId, PaymentStatus};

use super::RepositoryError;
use crate::models::{NewOrderLine, Order, OrderItem};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order with the given lines in one transaction.
    ///
    /// Each line's unit price is read from the product inside the same
    /// statement that inserts the line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the customer or a product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn place(
        &self,
        customer_id: CustomerId,
        lines: &[NewOrderLine],
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO store.orders (customer_id)
            VALUES ($1)
            RETURNING id, customer_id, placed_at, payment_status
            ",
        )
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::on_write)?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = sqlx::query_as::<_, OrderItem>(
                r"
                INSERT INTO store.order_items (order_id, product_id, quantity, unit_price)
                SELECT $1, p.id, $3, p.unit_price
                FROM store.products p
                WHERE p.id = $2
                RETURNING id, order_id, product_id, quantity, unit_price
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::on_write)?
            .ok_or_else(|| {
                RepositoryError::MissingReference(format!("product {}", line.product_id))
            })?;

            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %customer_id,
            lines = items.len(),
            "Placed order"
        );
        Ok((order, items))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            SELECT id, customer_id, placed_at, payment_status
            FROM store.orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// List the items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, quantity, unit_price
            FROM store.order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            SELECT id, customer_id, placed_at, payment_status
            FROM store.orders
            WHERE customer_id = $1
            ORDER BY placed_at DESC, id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Set an order's payment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_payment_status(
        &self,
        id: OrderId,
        status: PaymentStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE store.orders
            SET payment_status = $2
            WHERE id = $1
            RETURNING id, customer_id, placed_at, payment_status
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        tracing::info!(order_id = %id, payment_status = %status, "Updated payment status");
        Ok(order)
    }

    /// Delete an order that has no items.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` while the order has items.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        Ok(result.rows_affected() > 0)
    }
}
