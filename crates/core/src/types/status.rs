//! Single-character choice columns.
//!
//! `customers.membership` and `orders.payment_status` store a one-letter
//! code; admin screens show the matching label.

use serde::{Deserialize, Serialize};

/// Error returned when a stored code does not name a known choice.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} code: {code:?}")]
pub struct ParseCodeError {
    /// Which choice set was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub code: String,
}

macro_rules! choices {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = ($code:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every choice, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The code stored in the database.
            #[must_use]
            pub const fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// The human-readable label shown in admin screens.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parse a stored code.
            ///
            /// # Errors
            ///
            /// Returns [`ParseCodeError`] if `code` is not one of the known codes.
            pub fn from_code(code: &str) -> Result<Self, ParseCodeError> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ParseCodeError {
                        kind: $kind,
                        code: code.to_owned(),
                    }),
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ParseCodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_code(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.code()
            }
        }

        pg_text!($name, $name::from_code);
    };
}

choices! {
    /// Customer membership tier.
    MembershipTier, "membership" {
        #[default]
        Bronze = ("B", "Bronze"),
        Silver = ("S", "Silver"),
        Gold = ("G", "Gold"),
    }
}

choices! {
    /// Payment state of an order.
    PaymentStatus, "payment status" {
        #[default]
        Pending = ("P", "Pending"),
        Complete = ("C", "Complete"),
        Failed = ("F", "Failed"),
    }
}
