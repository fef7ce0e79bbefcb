//! # StoreHub Auth
//!
//! The authorization model of StoreHub, independent of storage and HTTP
//! plumbing.
//!
//! This crate provides:
//!
//! - [`identity`]: The authenticated user with its roles and derived
//!   permission set
//! - [`facade`]: [`Authorization`], the query layer over the optional current
//!   identity
//! - [`guard`]: [`Guard`] predicates with fixed denial messages
//! - [`self_service`]: The one exception to the user-management guard
//! - [`redirect`]: Where a user lands after signing in
//!
//! # Example
//!
//! ```ignore
//! use storehub_auth::{Authorization, Guard, Identity};
//! use storehub_core::{Permission, Role};
//!
//! let identity = Identity::new(user_id, "Ana", "ana@example.com", true)
//!     .with_roles([Role::Employee])
//!     .with_permissions(Role::Employee.default_permissions());
//! let auth = Authorization::new(identity);
//!
//! assert!(auth.has_permission(Permission::SalesView));
//! Guard::PermissionOrRole(Permission::UsersEdit, &Role::ADMINISTRATIVE).check(&auth)?;
//! ```

pub mod facade;
pub mod guard;
pub mod identity;
pub mod redirect;
pub mod self_service;

// Re-export commonly used types at crate root
pub use facade::{AuthSummary, AuthUserSummary, Authorization};
pub use guard::Guard;
pub use identity::Identity;
pub use redirect::{home_for, is_local_path, post_login_redirect};
pub use self_service::{SELF_SERVICE_ROUTE, is_self_profile_view};
