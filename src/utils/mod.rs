//! Utility modules for the StoreHub server.
//!
//! - [`flash`]: One-request session values (field errors, old input,
//!   success messages)
//! - [`page`]: The `{component, props}` page object returned by page routes

pub mod flash;
pub mod page;
