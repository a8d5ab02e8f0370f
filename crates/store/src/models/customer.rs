//! Customers and addresses.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, Email, MembershipTier};

use super::{FieldError, check_required, check_varchar};

/// Width of `customers.first_name` and `customers.last_name`.
pub const NAME_MAX_LENGTH: usize = 100;
/// Width of `customers.phone`.
pub const PHONE_MAX_LENGTH: usize = 50;
/// Width of `addresses.street` and `addresses.city`.
pub const ADDRESS_LINE_MAX_LENGTH: usize = 255;

/// A storefront customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, unique across customers.
    pub email: Email,
    /// Phone number as entered.
    pub phone: String,
    /// Date of birth, if known.
    pub birth_date: Option<NaiveDate>,
    /// Membership tier.
    pub membership: MembershipTier,
}

/// "First Last", as shown in admin lists.
impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub membership: MembershipTier,
}

impl NewCustomer {
    /// Check names and phone fit their columns.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` for the first column that does not fit.
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("first_name", &self.first_name)?;
        check_varchar("first_name", &self.first_name, NAME_MAX_LENGTH)?;
        check_required("last_name", &self.last_name)?;
        check_varchar("last_name", &self.last_name, NAME_MAX_LENGTH)?;
        check_varchar("phone", &self.phone, PHONE_MAX_LENGTH)
    }
}

/// A customer's address. Each customer has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    /// Owning customer; also the address's primary key.
    pub customer_id: CustomerId,
    pub street: String,
    pub city: String,
    #[sqlx(try_from = "i32")]
    pub zip: u32,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} {}", self.street, self.city, self.zip)
    }
}

/// Input for setting a customer's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub zip: u32,
}

impl NewAddress {
    /// Check street, city and zip fit their columns.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` for the first column that does not fit.
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("street", &self.street)?;
        check_varchar("street", &self.street, ADDRESS_LINE_MAX_LENGTH)?;
        check_required("city", &self.city)?;
        check_varchar("city", &self.city, ADDRESS_LINE_MAX_LENGTH)?;
        self.zip_column().map(|_| ())
    }

    /// The zip as stored in the `INTEGER` column.
    pub(crate) fn zip_column(&self) -> Result<i32, FieldError> {
        i32::try_from(self.zip).map_err(|_| FieldError::new("zip", "is too large"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_customer() -> NewCustomer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: "555-0100".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1815, 12, 10),
            membership: MembershipTier::default(),
        }
    }

    #[test]
    fn test_new_customer_validates() {
        assert!(new_customer().validate().is_ok());
    }

    #[test]
    fn test_long_last_name_is_rejected() {
        let mut input = new_customer();
        input.last_name = "x".repeat(101);
        assert_eq!(input.validate().map_err(|e| e.field), Err("last_name"));
    }

    #[test]
    fn test_membership_defaults_to_bronze_when_omitted() {
        let json = r#"{
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "",
            "birth_date": null
        }"#;
        let input: NewCustomer = serde_json::from_str(json).unwrap();
        assert_eq!(input.membership, MembershipTier::Bronze);
    }

    #[test]
    fn test_address_zip_must_fit_column() {
        let address = NewAddress {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            zip: u32::MAX,
        };
        assert_eq!(address.validate().map_err(|e| e.field), Err("zip"));
    }

    #[test]
    fn test_display() {
        let address = Address {
            customer_id: CustomerId::new(1),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            zip: 12345,
        };
        assert_eq!(address.to_string(), "1 Main St, Springfield 12345");
    }
}
