//! The permission catalog.
//!
//! Every capability checked by a guard is a [`Permission`] variant. Keys use
//! the `domain:action` format and are the values stored in the `permissions`
//! table and serialized over the wire. Labels and categories come from a
//! static table indexed by the variant, so adding a permission means adding
//! one variant and one table row.
//!
//! # Example
//!
//! ```ignore
//! use storehub_core::permissions::{Permission, PermissionCategory};
//!
//! let permission: Permission = "sales:view".parse()?;
//! assert_eq!(permission.category(), PermissionCategory::Sales);
//!
//! for (category, permissions) in Permission::grouped() {
//!     println!("{}: {}", category.label(), permissions.len());
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CatalogError;

/// Display grouping used by the role administration screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PermissionCategory {
    Users,
    Clients,
    Suppliers,
    Products,
    Sales,
    Inventory,
    Pqrs,
    Roles,
    Dashboard,
}

impl PermissionCategory {
    pub const ALL: [PermissionCategory; 9] = [
        PermissionCategory::Users,
        PermissionCategory::Clients,
        PermissionCategory::Suppliers,
        PermissionCategory::Products,
        PermissionCategory::Sales,
        PermissionCategory::Inventory,
        PermissionCategory::Pqrs,
        PermissionCategory::Roles,
        PermissionCategory::Dashboard,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PermissionCategory::Users => "users",
            PermissionCategory::Clients => "clients",
            PermissionCategory::Suppliers => "suppliers",
            PermissionCategory::Products => "products",
            PermissionCategory::Sales => "sales",
            PermissionCategory::Inventory => "inventory",
            PermissionCategory::Pqrs => "pqrs",
            PermissionCategory::Roles => "roles",
            PermissionCategory::Dashboard => "dashboard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermissionCategory::Users => "Users",
            PermissionCategory::Clients => "Clients",
            PermissionCategory::Suppliers => "Suppliers",
            PermissionCategory::Products => "Products",
            PermissionCategory::Sales => "Sales notes",
            PermissionCategory::Inventory => "Inventory",
            PermissionCategory::Pqrs => "PQRS",
            PermissionCategory::Roles => "Roles & permissions",
            PermissionCategory::Dashboard => "Dashboard",
        }
    }
}

impl Serialize for PermissionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    // Users
    UsersView,
    UsersCreate,
    UsersEdit,
    UsersDelete,
    // Clients
    ClientsView,
    ClientsCreate,
    ClientsEdit,
    ClientsDelete,
    // Suppliers
    SuppliersView,
    SuppliersCreate,
    SuppliersEdit,
    SuppliersDelete,
    // Products
    ProductsView,
    ProductsCreate,
    ProductsEdit,
    ProductsDelete,
    // Sales notes
    SalesView,
    SalesCreate,
    SalesEdit,
    SalesCancel,
    // Inventory adjustments
    InventoryView,
    InventoryAdjust,
    // PQRS
    PqrsView,
    PqrsCreate,
    PqrsRespond,
    // Roles
    RolesView,
    RolesEdit,
    RolesAssign,
    // Dashboard
    DashboardView,
    ReportsExport,
}

/// One row of the permission lookup table.
#[derive(Debug)]
pub struct PermissionInfo {
    pub permission: Permission,
    pub key: &'static str,
    pub label: &'static str,
    pub category: PermissionCategory,
}

macro_rules! catalog {
    ($($variant:ident => $key:literal, $label:literal, $category:ident;)*) => {
        impl Permission {
            /// Every permission, in declaration order.
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),*];
        }

        const CATALOG: &[PermissionInfo] = &[$(
            PermissionInfo {
                permission: Permission::$variant,
                key: $key,
                label: $label,
                category: PermissionCategory::$category,
            }
        ),*];
    };
}

catalog! {
    UsersView => "users:view", "View users", Users;
    UsersCreate => "users:create", "Create users", Users;
    UsersEdit => "users:edit", "Edit users", Users;
    UsersDelete => "users:delete", "Delete users", Users;
    ClientsView => "clients:view", "View clients", Clients;
    ClientsCreate => "clients:create", "Create clients", Clients;
    ClientsEdit => "clients:edit", "Edit clients", Clients;
    ClientsDelete => "clients:delete", "Delete clients", Clients;
    SuppliersView => "suppliers:view", "View suppliers", Suppliers;
    SuppliersCreate => "suppliers:create", "Create suppliers", Suppliers;
    SuppliersEdit => "suppliers:edit", "Edit suppliers", Suppliers;
    SuppliersDelete => "suppliers:delete", "Delete suppliers", Suppliers;
    ProductsView => "products:view", "View products", Products;
    ProductsCreate => "products:create", "Create products", Products;
    ProductsEdit => "products:edit", "Edit products", Products;
    ProductsDelete => "products:delete", "Delete products", Products;
    SalesView => "sales:view", "View sales notes", Sales;
    SalesCreate => "sales:create", "Create sales notes", Sales;
    SalesEdit => "sales:edit", "Edit sales notes", Sales;
    SalesCancel => "sales:cancel", "Cancel sales notes", Sales;
    InventoryView => "inventory:view", "View inventory adjustments", Inventory;
    InventoryAdjust => "inventory:adjust", "Adjust inventory", Inventory;
    PqrsView => "pqrs:view", "View PQRS", Pqrs;
    PqrsCreate => "pqrs:create", "File PQRS", Pqrs;
    PqrsRespond => "pqrs:respond", "Respond to PQRS", Pqrs;
    RolesView => "roles:view", "View roles", Roles;
    RolesEdit => "roles:edit", "Edit role permissions", Roles;
    RolesAssign => "roles:assign", "Assign roles to users", Roles;
    DashboardView => "dashboard:view", "Access the dashboard", Dashboard;
    ReportsExport => "reports:export", "Export reports", Dashboard;
}

impl Permission {
    pub fn info(self) -> &'static PermissionInfo {
        &CATALOG[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn category(self) -> PermissionCategory {
        self.info().category
    }

    /// The user-management capabilities (`users:*`).
    pub const USER_MANAGEMENT: [Permission; 4] = [
        Permission::UsersView,
        Permission::UsersCreate,
        Permission::UsersEdit,
        Permission::UsersDelete,
    ];

    /// The catalog grouped by category, categories and permissions in
    /// declaration order.
    pub fn grouped() -> Vec<(PermissionCategory, Vec<Permission>)> {
        PermissionCategory::ALL
            .iter()
            .map(|&category| {
                let permissions = Permission::ALL
                    .iter()
                    .copied()
                    .filter(|p| p.category() == category)
                    .collect();
                (category, permissions)
            })
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Permission {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .find(|info| info.key == s)
            .map(|info| info.permission)
            .ok_or_else(|| CatalogError::UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}
