//! Customer repository.

use sqlx::PgPool;

use storefront_core::{CustomerId, Email, MembershipTier};

use super::RepositoryError;
use crate::models::{Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, email, phone, birth_date, membership";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Invalid` if a name or phone does not fit.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewCustomer) -> Result<Customer, RepositoryError> {
        input.validate()?;

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r"
            INSERT INTO store.customers (first_name, last_name, email, phone, birth_date, membership)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.birth_date)
        .bind(input.membership)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match RepositoryError::on_write(e) {
            RepositoryError::Conflict(_) => {
                RepositoryError::Conflict("email already exists".to_owned())
            }
            other => other,
        })?;

        tracing::info!(customer_id = %customer.id, "Created customer");
        Ok(customer)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored value fails validation.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM store.customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Get a customer by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored value fails validation.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM store.customers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Find customers whose last name starts with `last_name_prefix`,
    /// ordered by last then first name (served by the name index).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_by_name(
        &self,
        last_name_prefix: &str,
        limit: i64,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let pattern = format!("{}%", escape_like(last_name_prefix));

        sqlx::query_as::<_, Customer>(&format!(
            r"
            SELECT {CUSTOMER_COLUMNS}
            FROM store.customers
            WHERE last_name LIKE $1
            ORDER BY last_name, first_name, id
            LIMIT $2
            "
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on_read)
    }

    /// Change a customer's membership tier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_membership(
        &self,
        id: CustomerId,
        membership: MembershipTier,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "UPDATE store.customers SET membership = $2 WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(membership)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on_write)?;

        tracing::info!(customer_id = %id, membership = %membership, "Updated membership");
        Ok(customer)
    }

    /// Delete a customer together with their cart, cart items and address.
    ///
    /// # Returns
    ///
    /// Returns `true` if the customer was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` while the customer has orders.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.customers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::on_delete)?;

        if result.rows_affected() > 0 {
            tracing::info!(customer_id = %id, "Deleted customer");
        }
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("O'Brien"), "O'Brien");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
