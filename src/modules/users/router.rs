use axum::{
    Router, middleware,
    routing::{delete, get, patch, put},
};
use storehub_auth::Guard;
use storehub_core::{Permission, Role};

use super::controller::{
    assign_user_roles, delete_user, get_user, get_users, update_user, update_user_status,
};
use crate::guard;
use crate::middleware::auth::require_auth;
use crate::middleware::guard::require_user_management;
use crate::state::AppState;

const ADMINISTRATIVE: &[Role] = &Role::ADMINISTRATIVE;
const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];

/// Stages run outermost first: `require_auth`, the user-management stage,
/// then the per-route guard.
pub fn init_users_router() -> Router<AppState> {
    let read = Router::new()
        .route("/users", get(get_users))
        .route("/users/{user}", get(get_user));

    let edit = Router::new()
        .route("/users/{user}", put(update_user))
        .route("/users/{user}/status", patch(update_user_status))
        .route_layer(guard!(Guard::PermissionOrRole(Permission::UsersEdit, ADMINISTRATIVE)));

    let destroy = Router::new()
        .route("/users/{user}", delete(delete_user))
        .route_layer(guard!(Guard::PermissionOrRole(Permission::UsersDelete, ADMINISTRATIVE)));

    let roles = Router::new()
        .route("/users/{user}/roles", put(assign_user_roles))
        .route_layer(guard!(Guard::PermissionOrRole(Permission::RolesAssign, SUPER_ADMIN)));

    read.merge(edit)
        .merge(destroy)
        .merge(roles)
        .route_layer(middleware::from_fn(require_user_management))
        .route_layer(middleware::from_fn(require_auth))
}
