//! Storefront store library.
//!
//! Owns the `PostgreSQL` side of the storefront data model:
//! - `migrations/` - the authoritative table, constraint, index and trigger
//!   definitions, embedded via [`db::MIGRATOR`]
//! - [`models`] - domain types for rows, with their admin display strings
//! - [`db`] - one repository per aggregate, translating constraint
//!   violations into [`db::RepositoryError`]
//! - [`config`] - connection settings loaded from the environment

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
