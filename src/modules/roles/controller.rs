use axum::{
    Json,
    extract::{Path, State},
};
use storehub_core::AppError;
use storehub_models::{PermissionGroup, RoleWithPermissions, RolesIndexResponse, SyncPermissionsDto};
use tracing::instrument;

use super::service::RoleService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List roles with their permission bundles and the grouped catalog
#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "Roles and catalog", body = RolesIndexResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn get_roles(State(state): State<AppState>) -> Result<Json<RolesIndexResponse>, AppError> {
    Ok(Json(RoleService::index(state.roles.as_ref()).await?))
}

/// Show one role's permission bundle
#[utoipa::path(
    get,
    path = "/roles/{role}",
    params(("role" = String, Path, description = "Role key, e.g. `employee`")),
    responses(
        (status = 200, description = "Role with permissions", body = RoleWithPermissions),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Unknown role", body = ErrorResponse)
    ),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn get_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::resolve_role(&role)?;
    Ok(Json(RoleService::show(state.roles.as_ref(), role).await?))
}

/// The permission catalog grouped by category
#[utoipa::path(
    get,
    path = "/permissions",
    responses(
        (status = 200, description = "Grouped catalog", body = Vec<PermissionGroup>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Roles"
)]
pub async fn get_permissions() -> Json<Vec<PermissionGroup>> {
    Json(PermissionGroup::catalog())
}

/// Replace a role's permission bundle
///
/// The `super_admin` bundle cannot be edited.
#[utoipa::path(
    put,
    path = "/roles/{role}/permissions",
    params(("role" = String, Path, description = "Role key, e.g. `employee`")),
    request_body = SyncPermissionsDto,
    responses(
        (status = 200, description = "Updated role", body = RoleWithPermissions),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Unknown role", body = ErrorResponse),
        (status = 422, description = "Locked role or unknown permission key", body = ErrorResponse)
    ),
    tag = "Roles"
)]
#[instrument(skip(state, dto))]
pub async fn sync_role_permissions(
    State(state): State<AppState>,
    Path(role): Path<String>,
    ValidatedJson(dto): ValidatedJson<SyncPermissionsDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::resolve_role(&role)?;
    let updated =
        RoleService::sync_permissions(state.roles.as_ref(), role, &dto.permissions).await?;
    Ok(Json(updated))
}
