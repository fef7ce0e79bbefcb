//! The authorization facade.
//!
//! [`Authorization`] wraps the identity attached to the current request, if
//! any, and answers every question handlers and guards ask about it. Queries
//! never fail: without an identity every capability check is `false` and
//! every list is empty.

use std::sync::Arc;

use serde::Serialize;
use storehub_core::{Permission, Role};
use storehub_models::UserId;
use utoipa::ToSchema;

use crate::identity::Identity;

#[derive(Debug, Clone, Default)]
pub struct Authorization {
    identity: Option<Arc<Identity>>,
}

impl Authorization {
    pub fn guest() -> Self {
        Self { identity: None }
    }

    pub fn new(identity: Identity) -> Self {
        Self::from_shared(Arc::new(identity))
    }

    pub fn from_shared(identity: Arc<Identity>) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity().map(|identity| identity.id)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.identity().map(|identity| identity.name.as_str())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.identity().is_some_and(|identity| identity.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.identity()
            .is_some_and(|identity| roles.iter().any(|role| identity.has_role(*role)))
    }

    /// `true` for an empty list as long as someone is signed in.
    pub fn has_all_roles(&self, roles: &[Role]) -> bool {
        self.identity()
            .is_some_and(|identity| roles.iter().all(|role| identity.has_role(*role)))
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.identity()
            .is_some_and(|identity| identity.has_permission(permission))
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.identity().is_some_and(|identity| {
            permissions
                .iter()
                .any(|permission| identity.has_permission(*permission))
        })
    }

    /// `true` for an empty list as long as someone is signed in.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.identity().is_some_and(|identity| {
            permissions
                .iter()
                .all(|permission| identity.has_permission(*permission))
        })
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    /// Holds an administrative role (`super_admin` or `admin`).
    pub fn is_admin(&self) -> bool {
        self.has_any_role(&Role::ADMINISTRATIVE)
    }

    pub fn is_employee(&self) -> bool {
        self.has_role(Role::Employee)
    }

    pub fn is_client(&self) -> bool {
        self.has_role(Role::Client)
    }

    pub fn is_active(&self) -> bool {
        self.identity().is_some_and(|identity| identity.active)
    }

    /// Active, and either administrative or granted `dashboard:view`.
    pub fn can_access_dashboard(&self) -> bool {
        self.is_active() && (self.is_admin() || self.has_permission(Permission::DashboardView))
    }

    pub fn can_manage_users(&self) -> bool {
        self.is_admin() || self.has_any_permission(&Permission::USER_MANAGEMENT)
    }

    pub fn primary_role(&self) -> Option<Role> {
        self.identity().and_then(Identity::primary_role)
    }

    pub fn roles(&self) -> Vec<Role> {
        self.identity()
            .map(|identity| identity.roles().to_vec())
            .unwrap_or_default()
    }

    /// Granted permissions in catalog order.
    pub fn permissions(&self) -> Vec<Permission> {
        self.identity()
            .map(|identity| identity.permissions().iter().copied().collect())
            .unwrap_or_default()
    }

    /// The `auth` props shared with every page.
    pub fn summary(&self) -> AuthSummary {
        AuthSummary {
            user: self.identity().map(|identity| AuthUserSummary {
                id: identity.id,
                name: identity.name.clone(),
                email: identity.email.clone(),
                active: identity.active,
            }),
            primary_role: self.primary_role(),
            roles: self.roles(),
            permissions: self.permissions(),
            is_admin: self.is_admin(),
            is_client: self.is_client(),
            can_access_dashboard: self.can_access_dashboard(),
            can_manage_users: self.can_manage_users(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthUserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub active: bool,
}

/// What the client UI knows about the current user. `user` is `null` for
/// guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthSummary {
    pub user: Option<AuthUserSummary>,
    #[schema(value_type = Option<String>, example = "admin")]
    pub primary_role: Option<Role>,
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<Role>,
    #[schema(value_type = Vec<String>)]
    pub permissions: Vec<Permission>,
    pub is_admin: bool,
    pub is_client: bool,
    pub can_access_dashboard: bool,
    pub can_manage_users: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_with(roles: &[Role], active: bool) -> Authorization {
        let identity = Identity::new(UserId::new(7), "Test User", "test@example.com", active)
            .with_roles(roles.iter().copied())
            .with_permissions(roles.iter().flat_map(|role| role.default_permissions()));
        Authorization::new(identity)
    }

    #[test]
    fn test_guest_has_no_access() {
        let auth = Authorization::guest();

        assert!(!auth.is_authenticated());
        assert!(!auth.has_role(Role::Client));
        assert!(!auth.has_any_role(&Role::ALL));
        assert!(!auth.has_all_roles(&[]));
        assert!(!auth.has_all_permissions(&[]));
        assert!(!auth.can_access_dashboard());
        assert_eq!(auth.primary_role(), None);
        assert!(auth.permissions().is_empty());
        assert!(auth.roles().is_empty());
        assert_eq!(auth.display_name(), None);
        assert_eq!(auth.summary().user, None);
    }

    #[test]
    fn test_zero_roles_means_every_check_is_false() {
        let auth = auth_with(&[], true);

        for role in Role::ALL {
            assert!(!auth.has_role(role));
        }
        for permission in Permission::ALL {
            assert!(!auth.has_permission(*permission));
        }
        assert!(!auth.is_admin());
        assert!(!auth.can_access_dashboard());
    }

    #[test]
    fn test_has_any_role_truth_table() {
        let pair = [Role::Employee, Role::Client];

        assert!(!auth_with(&[Role::Admin], true).has_any_role(&pair));
        assert!(auth_with(&[Role::Employee], true).has_any_role(&pair));
        assert!(auth_with(&[Role::Client], true).has_any_role(&pair));
        assert!(auth_with(&[Role::Employee, Role::Client], true).has_any_role(&pair));
    }

    #[test]
    fn test_has_all_roles() {
        let auth = auth_with(&[Role::Employee, Role::Client], true);
        assert!(auth.has_all_roles(&[Role::Employee, Role::Client]));
        assert!(!auth.has_all_roles(&[Role::Employee, Role::Admin]));
        assert!(auth.has_all_roles(&[]));
    }

    #[test]
    fn test_empty_permission_lists() {
        let auth = auth_with(&[Role::Client], true);
        assert!(auth.has_all_permissions(&[]));
        assert!(!auth.has_any_permission(&[]));
    }

    #[test]
    fn test_inactive_admin_is_admin_without_dashboard() {
        let auth = auth_with(&[Role::Admin], false);

        assert!(auth.is_admin());
        assert!(!auth.is_active());
        assert!(!auth.can_access_dashboard());
    }

    #[test]
    fn test_dashboard_access_through_permission() {
        assert!(auth_with(&[Role::Employee], true).can_access_dashboard());
        assert!(!auth_with(&[Role::Client], true).can_access_dashboard());
        assert!(auth_with(&[Role::Admin], true).can_access_dashboard());
    }

    #[test]
    fn test_can_manage_users() {
        assert!(auth_with(&[Role::SuperAdmin], true).can_manage_users());
        assert!(!auth_with(&[Role::Employee], true).can_manage_users());

        let delegated = Authorization::new(
            Identity::new(UserId::new(3), "Lead", "lead@example.com", true)
                .with_roles([Role::Employee])
                .with_permissions([Permission::UsersView]),
        );
        assert!(delegated.can_manage_users());
        assert!(!delegated.is_admin());
    }

    #[test]
    fn test_role_shortcuts() {
        let auth = auth_with(&[Role::SuperAdmin], true);
        assert!(auth.is_super_admin());
        assert!(auth.is_admin());
        assert!(!auth.is_employee());
        assert!(!auth.is_client());
        assert!(auth_with(&[Role::Client], true).is_client());
    }

    #[test]
    fn test_permissions_are_sorted_in_catalog_order() {
        let auth = Authorization::new(
            Identity::new(UserId::new(3), "Lead", "lead@example.com", true)
                .with_permissions([Permission::PqrsView, Permission::UsersView]),
        );
        assert_eq!(
            auth.permissions(),
            vec![Permission::UsersView, Permission::PqrsView]
        );
    }

    #[test]
    fn test_summary_serializes_keys() {
        let summary = auth_with(&[Role::Employee, Role::Admin], true).summary();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["user"]["id"], 7);
        assert_eq!(json["primary_role"], "admin");
        assert_eq!(json["roles"], serde_json::json!(["employee", "admin"]));
        assert_eq!(json["is_admin"], true);
        assert_eq!(json["can_manage_users"], true);
    }
}
