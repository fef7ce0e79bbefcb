use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use storehub_core::AppError;
use storehub_models::{
    AssignRolesDto, PaginatedUsersResponse, UpdateStatusDto, UpdateUserDto, User,
    UserFilterParams, UserId, UserWithRoles,
};
use tracing::instrument;

use super::service::UserService;
use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List users
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("search" = Option<String>, Query, description = "Match against name or email"),
        ("role" = Option<String>, Query, description = "Role key"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedUsersResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Cannot manage users", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    Ok(Json(UserService::list_users(state.users.as_ref(), &filter).await?))
}

/// Show a user with roles and customer record
///
/// Users may always view their own profile.
#[utoipa::path(
    get,
    path = "/users/{user}",
    params(("user" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserWithRoles),
        (status = 403, description = "Cannot manage users", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserWithRoles>, AppError> {
    Ok(Json(UserService::get_user(state.users.as_ref(), id).await?))
}

/// Update a user's name, email or phone
#[utoipa::path(
    put,
    path = "/users/{user}",
    params(("user" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::update_user(state.users.as_ref(), id, dto).await?))
}

/// Activate or deactivate a user
#[utoipa::path(
    patch,
    path = "/users/{user}/status",
    params(("user" = i64, Path, description = "User ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Cannot deactivate yourself", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, current, dto), fields(actor = %current.id))]
pub async fn update_user_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::set_status(state.users.as_ref(), current.id, id, dto.active).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{user}",
    params(("user" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Cannot delete yourself", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, current), fields(actor = %current.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(state.users.as_ref(), current.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a user's roles
#[utoipa::path(
    put,
    path = "/users/{user}/roles",
    params(("user" = i64, Path, description = "User ID")),
    request_body = AssignRolesDto,
    responses(
        (status = 200, description = "User with new roles", body = UserWithRoles),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Empty or unknown roles", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn assign_user_roles(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<AssignRolesDto>,
) -> Result<Json<UserWithRoles>, AppError> {
    Ok(Json(UserService::assign_roles(state.users.as_ref(), id, &dto.roles).await?))
}
