//! # StoreHub CLI
//!
//! Catalog seeding, account bootstrap and data-migration commands.
//!
//! ## Usage
//!
//! ```ignore
//! use storehub_cli::seeder::{catalog, legacy};
//!
//! catalog::seed_catalog(&pool).await?;
//! let report = legacy::reconcile_legacy_roles(&pool, true).await?;
//! println!("{} assignments would be imported", report.imported);
//! ```

pub mod seeder;
