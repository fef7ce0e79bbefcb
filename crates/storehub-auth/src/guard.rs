//! Route guards.
//!
//! A [`Guard`] is a pure predicate over [`Authorization`] paired with the
//! message returned when it fails. Alternatives inside a guard are OR-ed; a
//! route that needs several conditions stacks several guards, which the
//! router runs in declaration order.

use std::fmt;

use storehub_core::{AppError, Permission, Role};

use crate::facade::Authorization;

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
const ROLE_DENIED: &str = "You do not have the required role to access this resource.";
const DASHBOARD_DENIED: &str = "You do not have access to the dashboard.";
const MANAGE_USERS_DENIED: &str = "You do not have permission to manage users.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Permission(Permission),
    AnyPermission(&'static [Permission]),
    Role(Role),
    AnyRole(&'static [Role]),
    /// Holds the permission, or one of the roles.
    PermissionOrRole(Permission, &'static [Role]),
    DashboardAccess,
    ManageUsers,
}

impl Guard {
    pub fn allows(&self, auth: &Authorization) -> bool {
        match *self {
            Guard::Permission(permission) => auth.has_permission(permission),
            Guard::AnyPermission(permissions) => auth.has_any_permission(permissions),
            Guard::Role(role) => auth.has_role(role),
            Guard::AnyRole(roles) => auth.has_any_role(roles),
            Guard::PermissionOrRole(permission, roles) => {
                auth.has_permission(permission) || auth.has_any_role(roles)
            }
            Guard::DashboardAccess => auth.can_access_dashboard(),
            Guard::ManageUsers => auth.can_manage_users(),
        }
    }

    pub fn denial_message(&self) -> &'static str {
        match self {
            Guard::Permission(_) | Guard::AnyPermission(_) | Guard::PermissionOrRole(..) => {
                PERMISSION_DENIED
            }
            Guard::Role(_) | Guard::AnyRole(_) => ROLE_DENIED,
            Guard::DashboardAccess => DASHBOARD_DENIED,
            Guard::ManageUsers => MANAGE_USERS_DENIED,
        }
    }

    /// Low-cardinality name used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Guard::Permission(_) => "permission",
            Guard::AnyPermission(_) => "any_permission",
            Guard::Role(_) => "role",
            Guard::AnyRole(_) => "any_role",
            Guard::PermissionOrRole(..) => "permission_or_role",
            Guard::DashboardAccess => "dashboard_access",
            Guard::ManageUsers => "manage_users",
        }
    }

    /// `Ok(())` when the guard passes, a 403 carrying the denial message
    /// otherwise.
    pub fn check(&self, auth: &Authorization) -> Result<(), AppError> {
        if self.allows(auth) {
            Ok(())
        } else {
            Err(AppError::forbidden(self.denial_message()))
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Permission(permission) => write!(f, "permission:{permission}"),
            Guard::AnyPermission(permissions) => {
                write!(f, "any_permission:{}", join(permissions))
            }
            Guard::Role(role) => write!(f, "role:{role}"),
            Guard::AnyRole(roles) => write!(f, "any_role:{}", join(roles)),
            Guard::PermissionOrRole(permission, roles) => {
                write!(f, "permission_or_role:{permission}|{}", join(roles))
            }
            Guard::DashboardAccess => f.write_str("dashboard_access"),
            Guard::ManageUsers => f.write_str("manage_users"),
        }
    }
}
