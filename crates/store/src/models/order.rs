//! Orders and order items.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, OrderId, OrderItemId, PaymentStatus, ProductId, Quantity, UnitPrice};

/// An order placed by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer who placed the order. The customer cannot be deleted while orders exist.
    pub customer_id: CustomerId,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Payment state.
    pub payment_status: PaymentStatus,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{}", self.id)
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Product price when the order was placed. Never changes afterwards.
    pub unit_price: UnitPrice,
}

impl OrderItem {
    /// Quantity times the captured unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.line_total(self.quantity)
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × product #{}", self.quantity, self.product_id)
    }
}

/// A requested line when placing an order. The price is read from the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Sum of line totals.
#[must_use]
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, quantity: i32, cents: i64) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(id),
            order_id: OrderId::new(1),
            product_id: ProductId::new(id),
            quantity: Quantity::new(quantity).unwrap(),
            unit_price: UnitPrice::from_cents(cents).unwrap(),
        }
    }

    #[test]
    fn test_order_total() {
        let items = [item(1, 2, 1050), item(2, 1, 399)];
        assert_eq!(order_total(&items), Decimal::new(2499, 2));
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(item(7, 3, 100).to_string(), "3 × product #7");
    }
}
