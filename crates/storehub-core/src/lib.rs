//! # StoreHub Core
//!
//! Core types, errors, catalogs and utilities shared by every StoreHub crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination for list endpoints
//! - [`password`]: bcrypt password hashing and verification
//! - [`permissions`]: The closed permission catalog and its categories
//! - [`roles`]: The closed role catalog and the default grant bundles
//!
//! # Example
//!
//! ```ignore
//! use storehub_core::{AppError, Permission, Role};
//!
//! let permission: Permission = "users:view".parse()?;
//! assert_eq!(permission.label(), "View users");
//! assert!(Role::Admin.is_administrative());
//!
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::{AppError, CatalogError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, hash_password_with_cost, verify_password};
pub use permissions::{Permission, PermissionCategory};
pub use roles::Role;
