//! The authenticated user.

use std::collections::BTreeSet;

use storehub_core::{Permission, Role};
use storehub_models::UserId;

/// A user as seen by authorization: who they are, whether they may act, the
/// roles they hold (in assignment order) and the union of those roles'
/// grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub active: bool,
    roles: Vec<Role>,
    permissions: BTreeSet<Permission>,
}

impl Identity {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            active,
            roles: Vec::new(),
            permissions: BTreeSet::new(),
        }
    }

    /// Appends roles, skipping ones already held so assignment order is kept.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        for role in roles {
            if !self.roles.contains(&role) {
                self.roles.push(role);
            }
        }
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_administrative(&self) -> bool {
        self.roles.iter().any(|role| role.is_administrative())
    }

    /// First administrative role if any, else the first assigned role.
    pub fn primary_role(&self) -> Option<Role> {
        self.roles
            .iter()
            .copied()
            .find(|role| role.is_administrative())
            .or_else(|| self.roles.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new(UserId::new(1), "Ana", "ana@example.com", true)
    }

    #[test]
    fn test_roles_keep_assignment_order_without_duplicates() {
        let identity = identity().with_roles([Role::Client, Role::Employee, Role::Client]);
        assert_eq!(identity.roles(), &[Role::Client, Role::Employee]);
    }

    #[test]
    fn test_primary_role_prefers_administrative() {
        let admin = identity().with_roles([Role::Employee, Role::Admin]);
        assert_eq!(admin.primary_role(), Some(Role::Admin));

        let client = identity().with_roles([Role::Client, Role::Employee]);
        assert_eq!(client.primary_role(), Some(Role::Client));

        assert_eq!(identity().primary_role(), None);
    }

    #[test]
    fn test_permissions_are_a_set() {
        let identity = identity()
            .with_permissions(Role::Employee.default_permissions())
            .with_permissions([Permission::SalesView]);
        assert_eq!(identity.permissions().len(), Role::Employee.default_permissions().len());
    }
}
