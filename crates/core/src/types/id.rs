//! Newtype IDs for the storefront tables.
//!
//! Every table with a surrogate key gets its own ID type so a `CartId` can
//! never be bound where a `CustomerId` is expected. Addresses have no ID of
//! their own; they are keyed by [`CustomerId`].

/// Define a type-safe ID wrapper for a table's `SERIAL` primary key.
///
/// The generated type:
/// - wraps an `i32` and (de)serializes transparently
/// - exposes the owning table as `TABLE`
/// - implements `sqlx` `Type`, `Encode`, and `Decode` as `INTEGER`
///   (with the `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use storefront_core::define_id;
/// define_id!(WishlistId, "store.wishlists");
///
/// let id = WishlistId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(WishlistId::TABLE, "store.wishlists");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $table:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Table whose primary key this ID refers to.
            pub const TABLE: &'static str = $table;

            /// Wrap a raw primary key value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(PromotionId, "store.promotions");
define_id!(CollectionId, "store.collections");
define_id!(ProductId, "store.products");
define_id!(CustomerId, "store.customers");
define_id!(OrderId, "store.orders");
define_id!(OrderItemId, "store.order_items");
define_id!(CartId, "store.carts");
define_id!(CartItemId, "store.cart_items");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_know_their_table() {
        assert_eq!(ProductId::TABLE, "store.products");
        assert_eq!(CustomerId::TABLE, "store.customers");
        assert_eq!(CartItemId::TABLE, "store.cart_items");
    }

    #[test]
    fn test_conversions() {
        let id = OrderId::from(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&CollectionId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
