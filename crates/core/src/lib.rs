//! Storefront Core - typed values and schema metadata.
//!
//! This crate describes the storefront data model without touching a database:
//! - [`types`] - ID newtypes and validated column values (emails, slugs, prices,
//!   quantities, membership tiers, payment statuses)
//! - [`schema`] - Every table, foreign key, and deletion policy, plus the
//!   display names used by admin tooling
//!
//! Enable the `postgres` feature to get `sqlx` encode/decode impls for the
//! types in this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod schema;
pub mod types;

pub use types::*;
