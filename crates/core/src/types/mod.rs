//! Column value types for the storefront schema.
//!
//! Each type mirrors the constraint of the column it is stored in, so values
//! that the database would reject are caught at construction time.

/// Implement `sqlx` text encoding for a validated string-backed type.
///
/// Decoding re-runs `$parse`, so a row holding a value the type would reject
/// surfaces as a decode error instead of an invalid value.
macro_rules! pg_text {
    ($name:ty, $parse:path) => {
        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok($parse(s)?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_ref(), buf)
            }
        }
    };
}

pub mod email;
pub mod id;
pub mod price;
pub mod quantity;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{PriceError, UnitPrice};
pub use quantity::{Quantity, QuantityError};
pub use slug::{Slug, SlugError};
pub use status::{MembershipTier, ParseCodeError, PaymentStatus};
