//! Domain models for the storefront tables.
//!
//! Each model derives `sqlx::FromRow` and is read straight from its table.
//! `New*` types carry the columns a caller supplies on insert and validate
//! the widths the database would otherwise reject.

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;

pub use cart::{Cart, CartItem};
pub use catalog::{Collection, NewCollection, NewProduct, NewPromotion, Product, Promotion};
pub use customer::{Address, Customer, NewAddress, NewCustomer};
pub use order::{NewOrderLine, Order, OrderItem};

use thiserror::Error;

/// A caller-supplied value that does not fit its column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Column name.
    pub field: &'static str,
    /// What is wrong with the value.
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Reject values longer than a `VARCHAR(max)` column allows.
pub(crate) fn check_varchar(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len > max {
        return Err(FieldError::new(
            field,
            format!("must be at most {max} characters (got {len})"),
        ));
    }
    Ok(())
}

/// Reject empty or whitespace-only values for required text columns.
pub(crate) fn check_required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "cannot be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_varchar_counts_chars() {
        assert!(check_varchar("title", "ééé", 3).is_ok());
        assert_eq!(
            check_varchar("title", "abcd", 3).map_err(|e| e.to_string()),
            Err("title: must be at most 3 characters (got 4)".to_string())
        );
    }

    #[test]
    fn test_check_required() {
        assert!(check_required("city", "Paris").is_ok());
        assert!(check_required("city", "  ").is_err());
    }
}
