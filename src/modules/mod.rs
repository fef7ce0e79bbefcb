//! Feature modules.
//!
//! Each module follows the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business rules over the repositories
//! - `router.rs`: Routes and their guard stages

pub mod auth;
pub mod dashboard;
pub mod home;
pub mod roles;
pub mod users;
