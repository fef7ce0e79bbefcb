//! # StoreHub Models
//!
//! Entities, request DTOs and response shapes shared by the server and the
//! CLI.
//!
//! - [`auth`]: Login and registration forms
//! - [`dashboard`]: Dashboard date ranges and aggregates
//! - [`ids`]: Strongly-typed numeric identifiers
//! - [`roles`]: Role grant views and the grouped permission catalog
//! - [`users`]: Users, customers and user administration DTOs

pub mod auth;
pub mod dashboard;
pub mod ids;
pub mod roles;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginForm, RegisterForm};
pub use dashboard::{
    DEFAULT_RANGE_DAYS, DashboardMetrics, DateRange, DateRangeParams, PqrsStatus, SaleStatus,
    StatusCount, StatusTotal,
};
pub use ids::{CustomerId, UserId};
pub use roles::{
    PermissionGroup, PermissionView, RoleWithPermissions, RolesIndexResponse, SyncPermissionsDto,
};
pub use users::{
    AssignRolesDto, Customer, NewClient, PaginatedUsersResponse, UpdateStatusDto, UpdateUserDto,
    User, UserCredentials, UserFilterParams, UserWithRoles,
};
