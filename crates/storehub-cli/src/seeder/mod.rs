//! Seeding and reconciliation routines behind the CLI commands.
//!
//! - [`catalog`]: Mirrors the role and permission catalogs into the database
//! - [`users`]: Creates the first super administrator
//! - [`legacy`]: Imports legacy custom-role rows into `user_roles`
//! - [`clients`]: Generates fake client accounts for local testing

pub mod catalog;
pub mod clients;
pub mod legacy;
pub mod users;

pub type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;
