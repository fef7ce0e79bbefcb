//! The role catalog.
//!
//! Roles are a closed set. Their grant bundles live in storage
//! (`role_permissions`) and can be edited at runtime, except for
//! [`Role::SuperAdmin`] which always holds the whole catalog.
//! [`Role::default_permissions`] is the bundle written by the seeder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CatalogError;
use crate::permissions::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    SuperAdmin,
    Admin,
    Employee,
    Client,
}

struct RoleInfo {
    key: &'static str,
    label: &'static str,
    administrative: bool,
}

const ROLES: [RoleInfo; 4] = [
    RoleInfo {
        key: "super_admin",
        label: "Super Administrator",
        administrative: true,
    },
    RoleInfo {
        key: "admin",
        label: "Administrator",
        administrative: true,
    },
    RoleInfo {
        key: "employee",
        label: "Employee",
        administrative: false,
    },
    RoleInfo {
        key: "client",
        label: "Client",
        administrative: false,
    },
];

const EMPLOYEE_PERMISSIONS: &[Permission] = &[
    Permission::DashboardView,
    Permission::ClientsView,
    Permission::ClientsCreate,
    Permission::SuppliersView,
    Permission::ProductsView,
    Permission::SalesView,
    Permission::SalesCreate,
    Permission::InventoryView,
    Permission::PqrsView,
    Permission::PqrsRespond,
];

const CLIENT_PERMISSIONS: &[Permission] = &[Permission::PqrsCreate];

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Employee, Role::Client];

    /// The roles that carry elevated, back-office authority.
    pub const ADMINISTRATIVE: [Role; 2] = [Role::SuperAdmin, Role::Admin];

    fn info(self) -> &'static RoleInfo {
        &ROLES[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn is_administrative(self) -> bool {
        self.info().administrative
    }

    /// Whether the grant bundle may be edited through role administration.
    pub fn is_editable(self) -> bool {
        self != Role::SuperAdmin
    }

    pub fn default_permissions(self) -> Vec<Permission> {
        match self {
            Role::SuperAdmin => Permission::ALL.to_vec(),
            Role::Admin => Permission::ALL
                .iter()
                .copied()
                .filter(|p| *p != Permission::RolesEdit)
                .collect(),
            Role::Employee => EMPLOYEE_PERMISSIONS.to_vec(),
            Role::Client => CLIENT_PERMISSIONS.to_vec(),
        }
    }

    /// Maps a role name from the legacy custom-roles table onto the catalog.
    ///
    /// Matching ignores case, surrounding whitespace and the `-`/space/`_`
    /// separator differences, and accepts the Spanish names the old tables
    /// used.
    pub fn from_legacy_name(name: &str) -> Option<Role> {
        let normalized: String = name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "super_admin" | "superadmin" | "super_administrador" | "superadministrador" => {
                Some(Role::SuperAdmin)
            }
            "admin" | "administrator" | "administrador" => Some(Role::Admin),
            "employee" | "empleado" | "staff" | "vendedor" => Some(Role::Employee),
            "client" | "cliente" | "customer" => Some(Role::Client),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.key() == s)
            .ok_or_else(|| CatalogError::UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrative_classification() {
        assert!(Role::SuperAdmin.is_administrative());
        assert!(Role::Admin.is_administrative());
        assert!(!Role::Employee.is_administrative());
        assert!(!Role::Client.is_administrative());

        for role in Role::ADMINISTRATIVE {
            assert!(role.is_administrative());
        }
    }

    #[test]
    fn test_keys_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.key().parse::<Role>(), Ok(role));
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_bundles() {
        assert_eq!(Role::SuperAdmin.default_permissions().len(), Permission::ALL.len());

        let admin = Role::Admin.default_permissions();
        assert!(admin.contains(&Permission::UsersDelete));
        assert!(!admin.contains(&Permission::RolesEdit));

        let employee = Role::Employee.default_permissions();
        assert!(employee.contains(&Permission::DashboardView));
        assert!(!employee.contains(&Permission::UsersView));

        assert_eq!(Role::Client.default_permissions(), vec![Permission::PqrsCreate]);
    }

    #[test]
    fn test_only_super_admin_is_locked() {
        assert!(!Role::SuperAdmin.is_editable());
        assert!(Role::Admin.is_editable());
        assert!(Role::Client.is_editable());
    }

    #[test]
    fn test_from_legacy_name() {
        assert_eq!(Role::from_legacy_name("Super-Admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::from_legacy_name("  administrador "), Some(Role::Admin));
        assert_eq!(Role::from_legacy_name("Empleado"), Some(Role::Employee));
        assert_eq!(Role::from_legacy_name("cliente"), Some(Role::Client));
        assert_eq!(Role::from_legacy_name("auditor"), None);
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, r#""super_admin""#);
        assert_eq!(serde_json::from_str::<Role>(r#""client""#).unwrap(), Role::Client);
    }
}
