use storehub_auth::{AuthSummary, AuthUserSummary};
use storehub_core::{PaginationMeta, PaginationParams};
use storehub_models::{
    AssignRolesDto, Customer, DateRange, LoginForm, PaginatedUsersResponse, PermissionGroup,
    PermissionView, RegisterForm, RoleWithPermissions, RolesIndexResponse, StatusCount,
    StatusTotal, SyncPermissionsDto, UpdateStatusDto, UpdateUserDto, User, UserWithRoles,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::dashboard::model::{
    ClientsBlock, DashboardView, InventoryBlock, PqrsBlock, SalesBlock,
};
use crate::session::SESSION_COOKIE;
use crate::utils::page::Page;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::home::controller::home,
        crate::modules::home::controller::me,
        crate::modules::auth::controller::show_login,
        crate::modules::auth::controller::show_register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::logout,
        crate::modules::dashboard::controller::show_dashboard,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::update_user_status,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::assign_user_roles,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::get_permissions,
        crate::modules::roles::controller::sync_role_permissions,
    ),
    components(
        schemas(
            ErrorResponse,
            Page,
            AuthSummary,
            AuthUserSummary,
            LoginForm,
            RegisterForm,
            DateRange,
            StatusTotal,
            StatusCount,
            DashboardView,
            SalesBlock,
            ClientsBlock,
            InventoryBlock,
            PqrsBlock,
            User,
            Customer,
            UserWithRoles,
            UpdateUserDto,
            UpdateStatusDto,
            AssignRolesDto,
            PaginatedUsersResponse,
            PaginationMeta,
            PaginationParams,
            PermissionView,
            PermissionGroup,
            RoleWithPermissions,
            RolesIndexResponse,
            SyncPermissionsDto,
        )
    ),
    modifiers(&SecurityAddon),
    security(("session_cookie" = [])),
    tags(
        (name = "Home", description = "Landing page and current identity"),
        (name = "Authentication", description = "Login, registration and logout"),
        (name = "Dashboard", description = "Back-office metrics"),
        (name = "Users", description = "User management"),
        (name = "Roles", description = "Roles and the permission catalog")
    ),
    info(
        title = "StoreHub API",
        version = "0.1.0",
        description = "Back-office API for StoreHub with session-based authentication and role/permission authorization.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            )
        }
    }
}
