//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: Identity attachment, authentication and guest-only stages,
//!   plus the [`auth::Auth`] extractor
//! - [`guard`]: Guard stages, including user management with its
//!   self-service exception
//!
//! # Pipeline
//!
//! 1. `attach_identity` (global) loads the session's identity into the
//!    request extensions. It never rejects.
//! 2. `require_auth` turns guests away: `GET` requests are redirected to
//!    `/login` after remembering the URL, anything else gets a 401.
//! 3. Guard stages run in declaration order and answer 403 with the guard's
//!    message on failure.
//! 4. The handler runs and may shape its response through [`auth::Auth`].
//!
//! # Example
//!
//! ```ignore
//! use storehub_auth::Guard;
//! use storehub_core::{Permission, Role};
//!
//! Router::new()
//!     .route("/roles", get(list_roles))
//!     .route_layer(guard!(Guard::PermissionOrRole(
//!         Permission::RolesView,
//!         &[Role::SuperAdmin]
//!     )))
//!     .route_layer(middleware::from_fn(require_auth));
//! ```

pub mod auth;
pub mod guard;
