//! Storage ports and their implementations.
//!
//! Handlers only see the repository traits. [`PgStore`] backs the server;
//! [`InMemoryStore`] backs the integration tests and local demos.

use std::collections::BTreeSet;

use async_trait::async_trait;
use storehub_auth::Identity;
use storehub_core::{AppError, Permission, Role};
use storehub_models::{
    Customer, DashboardMetrics, DateRange, NewClient, PaginatedUsersResponse, PqrsStatus,
    RoleWithPermissions, SaleStatus, StatusCount, StatusTotal, UpdateUserDto, User,
    UserCredentials, UserFilterParams, UserId, UserWithRoles,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks an identity up by email, ignoring case.
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AppError>;

    /// Loads an identity with its roles and the union of their grants.
    async fn load_identity(&self, id: UserId) -> Result<Option<Identity>, AppError>;

    /// Creates an active identity holding only the client role plus its
    /// customer record, atomically. A taken email is a 409.
    async fn create_client(&self, client: NewClient) -> Result<(User, Customer), AppError>;

    async fn list_users(
        &self,
        filter: &UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError>;

    async fn find_user(&self, id: UserId) -> Result<Option<UserWithRoles>, AppError>;

    /// A taken email is a 409.
    async fn update_user(&self, id: UserId, dto: UpdateUserDto) -> Result<Option<User>, AppError>;

    async fn set_active(&self, id: UserId, active: bool) -> Result<Option<User>, AppError>;

    async fn delete_user(&self, id: UserId) -> Result<bool, AppError>;

    /// Replaces the role set, keeping the given order as assignment order.
    async fn assign_roles(&self, id: UserId, roles: &[Role]) -> Result<Option<Vec<Role>>, AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn grants(&self, role: Role) -> Result<Vec<Permission>, AppError>;

    /// Every role in catalog order with its current bundle.
    async fn all_grants(&self) -> Result<Vec<RoleWithPermissions>, AppError>;

    /// Replaces a role's bundle and returns the stored result.
    async fn sync_permissions(
        &self,
        role: Role,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, AppError>;
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn metrics(&self, range: DateRange) -> Result<DashboardMetrics, AppError>;
}

/// Builds an [`Identity`] from stored rows.
///
/// `super_admin` always holds the whole catalog, whatever its stored bundle
/// says.
pub(crate) fn build_identity(
    user: &User,
    roles: Vec<Role>,
    grants: impl IntoIterator<Item = Permission>,
) -> Identity {
    let mut permissions: BTreeSet<Permission> = grants.into_iter().collect();
    if roles.contains(&Role::SuperAdmin) {
        permissions.extend(Permission::ALL.iter().copied());
    }

    Identity::new(user.id, user.name.clone(), user.email.clone(), user.active)
        .with_roles(roles)
        .with_permissions(permissions)
}

/// Parses stored keys, dropping (and logging) ones the catalog no longer
/// knows.
pub(crate) fn parse_keys<T>(keys: impl IntoIterator<Item = String>) -> Vec<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    keys.into_iter()
        .filter_map(|key| match key.parse::<T>() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Ignoring stored catalog key");
                None
            }
        })
        .collect()
}

/// One row per sale status in a fixed order, zero-filled.
pub(crate) fn fill_sales(rows: Vec<StatusTotal>) -> Vec<StatusTotal> {
    SaleStatus::ALL
        .iter()
        .map(|status| {
            rows.iter()
                .find(|row| row.status == status.as_str())
                .cloned()
                .unwrap_or_else(|| StatusTotal {
                    status: status.as_str().to_string(),
                    count: 0,
                    total_cents: 0,
                })
        })
        .collect()
}

/// One row per PQRS status in a fixed order, zero-filled.
pub(crate) fn fill_pqrs(rows: Vec<StatusCount>) -> Vec<StatusCount> {
    PqrsStatus::ALL
        .iter()
        .map(|status| {
            rows.iter()
                .find(|row| row.status == status.as_str())
                .cloned()
                .unwrap_or_else(|| StatusCount {
                    status: status.as_str().to_string(),
                    count: 0,
                })
        })
        .collect()
}

pub(crate) fn paid_revenue(sales: &[StatusTotal]) -> i64 {
    sales
        .iter()
        .filter(|row| row.status == SaleStatus::Paid.as_str())
        .map(|row| row.total_cents)
        .sum()
}
