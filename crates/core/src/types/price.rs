//! Fixed-point unit prices.
//!
//! Every price column in the schema is `NUMERIC(6, 2)`: at most six digits,
//! two of them after the decimal point, so the largest storable price is
//! `9999.99`.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// Errors that can occur when constructing a [`UnitPrice`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The value has more than two significant fractional digits.
    #[error("price must have at most {max} decimal places (got {got})")]
    TooPrecise {
        /// Maximum fractional digits.
        max: u32,
        /// Fractional digits in the input.
        got: u32,
    },
    /// The value does not fit in `NUMERIC(6, 2)`.
    #[error("price must be between -{max} and {max}")]
    OutOfRange {
        /// Largest storable magnitude.
        max: Decimal,
    },
}

/// A price stored with exactly two decimal places.
///
/// Construction rejects values the `NUMERIC(6, 2)` columns would round or
/// overflow, then rescales the value so it always carries a scale of 2.
///
/// ```
/// use rust_decimal::Decimal;
/// use storefront_core::UnitPrice;
///
/// let price = UnitPrice::new(Decimal::new(199, 1)).unwrap(); // 19.9
/// assert_eq!(price.to_string(), "19.90");
/// assert_eq!(price.amount().scale(), 2);
///
/// assert!(UnitPrice::new(Decimal::new(19999, 3)).is_err()); // 19.999
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Fractional digits carried by every price.
    pub const SCALE: u32 = 2;
    /// Total digits allowed by the column.
    pub const MAX_DIGITS: u32 = 6;

    /// The zero price.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, Self::SCALE));

    /// Largest storable magnitude, `9999.99`.
    #[must_use]
    pub const fn max_value() -> Decimal {
        Decimal::from_parts(999_999, 0, 0, false, Self::SCALE)
    }

    /// Create a price from a decimal amount.
    ///
    /// Trailing zeros beyond two places are accepted (`1.500` becomes
    /// `1.50`); any other extra precision is rejected rather than rounded.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooPrecise`] if the amount needs more than two
    /// fractional digits, or [`PriceError::OutOfRange`] if its magnitude
    /// exceeds `9999.99`.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let significant = amount.normalize().scale();
        if significant > Self::SCALE {
            return Err(PriceError::TooPrecise {
                max: Self::SCALE,
                got: significant,
            });
        }
        if amount.abs() > Self::max_value() {
            return Err(PriceError::OutOfRange {
                max: Self::max_value(),
            });
        }

        let mut amount = amount;
        amount.rescale(Self::SCALE);
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] if the amount exceeds `9999.99`.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, Self::SCALE))
    }

    /// The amount, always with a scale of 2.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    ///
    /// The result is a plain decimal because line totals are not stored and
    /// may exceed the column range.
    #[must_use]
    pub fn line_total(&self, quantity: Quantity) -> Decimal {
        self.0 * Decimal::from(quantity.get())
    }
}

impl Default for UnitPrice {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for UnitPrice {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<UnitPrice> for Decimal {
    fn from(price: UnitPrice) -> Self {
        price.0
    }
}

impl std::str::FromStr for UnitPrice {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: Decimal = s.trim().parse()?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UnitPrice {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UnitPrice {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UnitPrice {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rescales_to_two_places() {
        assert_eq!(UnitPrice::new(Decimal::from(5)).unwrap().amount().scale(), 2);
        assert_eq!(UnitPrice::new(Decimal::new(15, 1)).unwrap().to_string(), "1.50");
        assert_eq!(UnitPrice::new(Decimal::new(1500, 3)).unwrap().to_string(), "1.50");
    }

    #[test]
    fn test_new_rejects_extra_precision() {
        assert_eq!(
            UnitPrice::new(Decimal::new(1001, 3)),
            Err(PriceError::TooPrecise { max: 2, got: 3 })
        );
    }

    #[test]
    fn test_range_limits() {
        assert!(UnitPrice::new(Decimal::new(999_999, 2)).is_ok());
        assert!(UnitPrice::new(Decimal::new(-999_999, 2)).is_ok());
        assert!(matches!(
            UnitPrice::new(Decimal::from(10_000)),
            Err(PriceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(UnitPrice::from_cents(1999).unwrap().to_string(), "19.99");
        assert!(UnitPrice::from_cents(1_000_000).is_err());
    }

    #[test]
    fn test_line_total() {
        let price = UnitPrice::from_cents(250).unwrap();
        let qty = Quantity::new(3).unwrap();
        assert_eq!(price.line_total(qty), Decimal::new(750, 2));
    }

    #[test]
    fn test_from_str() {
        let price: UnitPrice = "12.3".parse().unwrap();
        assert_eq!(price.to_string(), "12.30");
        assert!("12.345".parse::<UnitPrice>().is_err());
        assert!("abc".parse::<UnitPrice>().is_err());
    }

    #[test]
    fn test_serde_validates() {
        let price: UnitPrice = serde_json::from_str("\"4.5\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(450, 2));
        assert!(serde_json::from_str::<UnitPrice>("\"4.555\"").is_err());
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"4.50\"");
    }
}
