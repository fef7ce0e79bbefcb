use anyhow::anyhow;
use storehub_core::{AppError, Permission, Role};
use storehub_models::{PermissionGroup, RoleWithPermissions, RolesIndexResponse};
use tracing::{info, instrument};

use crate::store::RoleRepository;

pub const ROLE_LOCKED: &str = "The super_admin role always holds every permission and cannot be edited.";

pub struct RoleService;

impl RoleService {
    /// Resolves a role key from the path. Unknown keys are a 404.
    pub fn resolve_role(key: &str) -> Result<Role, AppError> {
        key.parse::<Role>()
            .map_err(|_| AppError::not_found(anyhow!("Role not found")))
    }

    #[instrument(skip(repo))]
    pub async fn index(repo: &dyn RoleRepository) -> Result<RolesIndexResponse, AppError> {
        Ok(RolesIndexResponse {
            roles: repo.all_grants().await?,
            catalog: PermissionGroup::catalog(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn show(repo: &dyn RoleRepository, role: Role) -> Result<RoleWithPermissions, AppError> {
        let permissions = if role == Role::SuperAdmin {
            Permission::ALL.to_vec()
        } else {
            repo.grants(role).await?
        };
        Ok(RoleWithPermissions::new(role, permissions))
    }

    /// Replaces the bundle of an editable role.
    #[instrument(skip(repo, permissions), fields(count = permissions.len()))]
    pub async fn sync_permissions(
        repo: &dyn RoleRepository,
        role: Role,
        permissions: &[Permission],
    ) -> Result<RoleWithPermissions, AppError> {
        if !role.is_editable() {
            return Err(AppError::unprocessable(anyhow!(ROLE_LOCKED)));
        }

        let stored = repo.sync_permissions(role, permissions).await?;
        info!(role = %role, count = stored.len(), "Role permissions synced");
        Ok(RoleWithPermissions::new(role, stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use axum::http::StatusCode;

    #[test]
    fn test_resolve_role() {
        assert_eq!(RoleService::resolve_role("employee").unwrap(), Role::Employee);
        let err = RoleService::resolve_role("owner").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_super_admin_bundle_is_locked() {
        let store = InMemoryStore::new();
        let err = RoleService::sync_permissions(&store, Role::SuperAdmin, &[Permission::UsersView])
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let shown = RoleService::show(&store, Role::SuperAdmin).await.unwrap();
        assert_eq!(shown.permissions.len(), Permission::ALL.len());
    }

    #[tokio::test]
    async fn test_sync_replaces_bundle() {
        let store = InMemoryStore::new();
        let synced = RoleService::sync_permissions(
            &store,
            Role::Employee,
            &[Permission::SalesView, Permission::DashboardView, Permission::SalesView],
        )
        .await
        .unwrap();

        assert_eq!(synced.permissions, vec![Permission::SalesView, Permission::DashboardView]);

        let index = RoleService::index(&store).await.unwrap();
        let employee = index.roles.iter().find(|r| r.role == Role::Employee).unwrap();
        assert_eq!(employee.permissions, synced.permissions);
        assert_eq!(index.catalog.len(), 9);
    }
}
