use axum::{
    Router, middleware,
    routing::{get, put},
};
use storehub_auth::Guard;
use storehub_core::{Permission, Role};

use super::controller::{get_permissions, get_role, get_roles, sync_role_permissions};
use crate::guard;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];

pub fn init_roles_router() -> Router<AppState> {
    let read = Router::new()
        .route("/roles", get(get_roles))
        .route("/roles/{role}", get(get_role))
        .route("/permissions", get(get_permissions))
        .route_layer(guard!(Guard::PermissionOrRole(Permission::RolesView, SUPER_ADMIN)));

    let edit = Router::new()
        .route("/roles/{role}/permissions", put(sync_role_permissions))
        .route_layer(guard!(Guard::PermissionOrRole(Permission::RolesEdit, SUPER_ADMIN)));

    read.merge(edit).route_layer(middleware::from_fn(require_auth))
}
