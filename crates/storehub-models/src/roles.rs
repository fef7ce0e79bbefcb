//! Role administration views.

use serde::{Deserialize, Serialize};
use storehub_core::{Permission, PermissionCategory, Role};
use utoipa::ToSchema;
use validator::Validate;

/// A permission as shown on the role screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PermissionView {
    #[schema(value_type = String, example = "users:view")]
    pub key: Permission,
    pub label: String,
    #[schema(value_type = String, example = "users")]
    pub category: PermissionCategory,
}

impl From<Permission> for PermissionView {
    fn from(permission: Permission) -> Self {
        Self {
            key: permission,
            label: permission.label().to_string(),
            category: permission.category(),
        }
    }
}

/// One category of the catalog with its permissions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionGroup {
    #[schema(value_type = String)]
    pub category: PermissionCategory,
    pub label: String,
    pub permissions: Vec<PermissionView>,
}

impl PermissionGroup {
    /// The whole catalog grouped by category.
    pub fn catalog() -> Vec<PermissionGroup> {
        Permission::grouped()
            .into_iter()
            .map(|(category, permissions)| PermissionGroup {
                category,
                label: category.label().to_string(),
                permissions: permissions.into_iter().map(PermissionView::from).collect(),
            })
            .collect()
    }
}

/// A role with its current grant bundle.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleWithPermissions {
    #[schema(value_type = String, example = "employee")]
    pub role: Role,
    pub label: String,
    pub is_administrative: bool,
    /// `false` for roles whose bundle cannot be changed
    pub editable: bool,
    #[schema(value_type = Vec<String>)]
    pub permissions: Vec<Permission>,
}

impl RoleWithPermissions {
    pub fn new(role: Role, mut permissions: Vec<Permission>) -> Self {
        permissions.sort();
        permissions.dedup();
        Self {
            role,
            label: role.label().to_string(),
            is_administrative: role.is_administrative(),
            editable: role.is_editable(),
            permissions,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RolesIndexResponse {
    pub roles: Vec<RoleWithPermissions>,
    pub catalog: Vec<PermissionGroup>,
}

/// Replaces a role's grant bundle.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SyncPermissionsDto {
    #[schema(value_type = Vec<String>, example = json!(["sales:view", "sales:create"]))]
    pub permissions: Vec<Permission>,
}
