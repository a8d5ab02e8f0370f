//! Carts and cart items.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{CartId, CartItemId, CustomerId, ProductId, Quantity, UnitPrice};

/// A customer's cart. Each customer has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning customer. Deleting the customer deletes the cart.
    pub customer_id: CustomerId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cart #{}", self.id)
    }
}

/// One product line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Product price when the item was added.
    pub unit_price: UnitPrice,
}

impl CartItem {
    /// Quantity times the captured unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.line_total(self.quantity)
    }
}

impl fmt::Display for CartItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × product #{}", self.quantity, self.product_id)
    }
}
