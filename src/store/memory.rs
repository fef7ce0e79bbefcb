//! In-memory repositories for tests and local demos.
//!
//! All state sits behind one `tokio::sync::RwLock`, so multi-step writes
//! such as client registration are atomic with respect to other callers.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use storehub_auth::Identity;
use storehub_core::{AppError, PaginationMeta, Permission, Role};
use storehub_models::{
    Customer, CustomerId, DashboardMetrics, DateRange, NewClient, PaginatedUsersResponse,
    PqrsStatus, RoleWithPermissions, SaleStatus, StatusCount, StatusTotal, UpdateUserDto, User,
    UserCredentials, UserFilterParams, UserId, UserWithRoles,
};
use tokio::sync::RwLock;

use super::{
    DashboardRepository, RoleRepository, UserRepository, build_identity, fill_pqrs, fill_sales,
    paid_revenue,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
    roles: Vec<Role>,
}

#[derive(Debug, Clone, Copy)]
struct Sale {
    status: SaleStatus,
    total_cents: i64,
    issued_on: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
struct Product {
    stock: i32,
    min_stock: i32,
}

#[derive(Debug, Clone, Copy)]
struct Pqrs {
    status: PqrsStatus,
    created_on: NaiveDate,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, StoredUser>,
    customers: Vec<Customer>,
    grants: HashMap<Role, BTreeSet<Permission>>,
    sales: Vec<Sale>,
    products: Vec<Product>,
    pqrs: Vec<Pqrs>,
    next_user_id: i64,
    next_customer_id: i64,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|stored| {
            Some(stored.user.id) != except && stored.user.email.eq_ignore_ascii_case(email)
        })
    }

    fn with_roles(&self, stored: &StoredUser) -> UserWithRoles {
        UserWithRoles {
            user: stored.user.clone(),
            roles: stored.roles.clone(),
            customer: self
                .customers
                .iter()
                .find(|customer| customer.user_id == Some(stored.user.id))
                .cloned(),
        }
    }

    fn grants_of(&self, role: Role) -> Vec<Permission> {
        self.grants
            .get(&role)
            .map(|grants| grants.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Every repository trait over process memory. Roles start with their
/// default bundles.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        let grants = Role::ALL
            .iter()
            .map(|role| (*role, role.default_permissions().into_iter().collect()))
            .collect();

        Self {
            state: RwLock::new(State {
                grants,
                next_user_id: 1,
                next_customer_id: 1,
                ..State::default()
            }),
        }
    }

    /// Adds an identity with the given roles and returns its id.
    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        active: bool,
        roles: &[Role],
    ) -> UserId {
        let mut state = self.state.write().await;
        let id = UserId::new(state.next_user_id);
        state.next_user_id += 1;

        let now = Utc::now();
        let mut assigned = Vec::new();
        for role in roles {
            if !assigned.contains(role) {
                assigned.push(*role);
            }
        }

        state.users.insert(
            id,
            StoredUser {
                user: User {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: None,
                    active,
                    created_at: now,
                    updated_at: now,
                },
                password_hash: password_hash.to_string(),
                roles: assigned,
            },
        );
        id
    }

    pub async fn add_sale(&self, status: SaleStatus, total_cents: i64, issued_on: NaiveDate) {
        self.state.write().await.sales.push(Sale {
            status,
            total_cents,
            issued_on,
        });
    }

    pub async fn add_product(&self, stock: i32, min_stock: i32) {
        self.state
            .write()
            .await
            .products
            .push(Product { stock, min_stock });
    }

    pub async fn add_pqrs(&self, status: PqrsStatus, created_on: NaiveDate) {
        self.state
            .write()
            .await
            .pqrs
            .push(Pqrs { status, created_on });
    }

    /// Customer records owned by an identity.
    pub async fn customers_of(&self, id: UserId) -> Vec<Customer> {
        self.state
            .read()
            .await
            .customers
            .iter()
            .filter(|customer| customer.user_id == Some(id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email.eq_ignore_ascii_case(email))
            .map(|stored| UserCredentials {
                id: stored.user.id,
                password_hash: stored.password_hash.clone(),
                active: stored.user.active,
            }))
    }

    async fn load_identity(&self, id: UserId) -> Result<Option<Identity>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|stored| {
            let grants = stored
                .roles
                .iter()
                .flat_map(|role| state.grants_of(*role))
                .collect::<Vec<_>>();
            build_identity(&stored.user, stored.roles.clone(), grants)
        }))
    }

    async fn create_client(&self, client: NewClient) -> Result<(User, Customer), AppError> {
        let mut state = self.state.write().await;
        if state.email_taken(&client.email, None) {
            return Err(AppError::conflict(anyhow::anyhow!(
                "The email has already been taken."
            )));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(state.next_user_id),
            name: client.name,
            email: client.email,
            phone: client.phone,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let customer = Customer {
            id: CustomerId::new(state.next_customer_id),
            user_id: Some(user.id),
            code: Customer::code_for(user.id),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: now,
        };
        state.next_user_id += 1;
        state.next_customer_id += 1;

        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: client.password_hash,
                roles: vec![Role::Client],
            },
        );
        state.customers.push(customer.clone());

        Ok((user, customer))
    }

    async fn list_users(
        &self,
        filter: &UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let state = self.state.read().await;
        let search = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let role = filter
            .role
            .as_deref()
            .and_then(|key| key.parse::<Role>().ok());

        if filter.role.as_deref().is_some_and(|key| !key.is_empty()) && role.is_none() {
            return Ok(PaginatedUsersResponse {
                data: Vec::new(),
                meta: PaginationMeta::new(0, &filter.pagination),
            });
        }

        let matching: Vec<&StoredUser> = state
            .users
            .values()
            .filter(|stored| {
                search.as_ref().is_none_or(|needle| {
                    stored.user.name.to_lowercase().contains(needle)
                        || stored.user.email.to_lowercase().contains(needle)
                })
            })
            .filter(|stored| role.is_none_or(|role| stored.roles.contains(&role)))
            .collect();

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(filter.pagination.offset() as usize)
            .take(filter.pagination.limit() as usize)
            .map(|stored| state.with_roles(stored))
            .collect();

        Ok(PaginatedUsersResponse {
            data,
            meta: PaginationMeta::new(total, &filter.pagination),
        })
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserWithRoles>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|stored| state.with_roles(stored)))
    }

    async fn update_user(&self, id: UserId, dto: UpdateUserDto) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        if let Some(email) = &dto.email
            && state.email_taken(email, Some(id))
        {
            return Err(AppError::conflict(anyhow::anyhow!(
                "The email has already been taken."
            )));
        }

        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = dto.name {
            stored.user.name = name;
        }
        if let Some(email) = dto.email {
            stored.user.email = email;
        }
        if let Some(phone) = dto.phone {
            stored.user.phone = Some(phone).filter(|phone| !phone.is_empty());
        }
        stored.user.updated_at = Utc::now();

        Ok(Some(stored.user.clone()))
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|stored| {
            stored.user.active = active;
            stored.user.updated_at = Utc::now();
            stored.user.clone()
        }))
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let removed = state.users.remove(&id).is_some();
        if removed {
            state.customers.retain(|customer| customer.user_id != Some(id));
        }
        Ok(removed)
    }

    async fn assign_roles(&self, id: UserId, roles: &[Role]) -> Result<Option<Vec<Role>>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|stored| {
            stored.roles.clear();
            for role in roles {
                if !stored.roles.contains(role) {
                    stored.roles.push(*role);
                }
            }
            stored.roles.clone()
        }))
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn grants(&self, role: Role) -> Result<Vec<Permission>, AppError> {
        Ok(self.state.read().await.grants_of(role))
    }

    async fn all_grants(&self) -> Result<Vec<RoleWithPermissions>, AppError> {
        let state = self.state.read().await;
        Ok(Role::ALL
            .iter()
            .map(|role| RoleWithPermissions::new(*role, state.grants_of(*role)))
            .collect())
    }

    async fn sync_permissions(
        &self,
        role: Role,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, AppError> {
        let mut state = self.state.write().await;
        state
            .grants
            .insert(role, permissions.iter().copied().collect());
        Ok(state.grants_of(role))
    }
}

#[async_trait]
impl DashboardRepository for InMemoryStore {
    async fn metrics(&self, range: DateRange) -> Result<DashboardMetrics, AppError> {
        let state = self.state.read().await;
        let in_range = |date: NaiveDate| date >= range.from && date <= range.to;

        let sales = SaleStatus::ALL
            .iter()
            .map(|status| {
                let rows: Vec<&Sale> = state
                    .sales
                    .iter()
                    .filter(|sale| sale.status == *status && in_range(sale.issued_on))
                    .collect();
                StatusTotal {
                    status: status.as_str().to_string(),
                    count: rows.len() as i64,
                    total_cents: rows.iter().map(|sale| sale.total_cents).sum(),
                }
            })
            .collect();
        let sales_by_status = fill_sales(sales);

        let pqrs = PqrsStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: status.as_str().to_string(),
                count: state
                    .pqrs
                    .iter()
                    .filter(|pqrs| pqrs.status == *status && in_range(pqrs.created_on))
                    .count() as i64,
            })
            .collect();

        Ok(DashboardMetrics {
            paid_revenue_cents: paid_revenue(&sales_by_status),
            sales_by_status,
            customers_total: state.customers.len() as i64,
            customers_new: state
                .customers
                .iter()
                .filter(|customer| in_range(customer.created_at.date_naive()))
                .count() as i64,
            products_total: state.products.len() as i64,
            products_low_stock: state
                .products
                .iter()
                .filter(|product| product.stock <= product.min_stock)
                .count() as i64,
            pqrs_by_status: fill_pqrs(pqrs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_client_assigns_role_and_customer() {
        let store = InMemoryStore::new();
        let (user, customer) = store
            .create_client(NewClient {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password_hash: "hash".to_string(),
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(customer.code, Customer::code_for(user.id));
        let found = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(found.roles, vec![Role::Client]);
        assert_eq!(store.customers_of(user.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_client_rejects_taken_email() {
        let store = InMemoryStore::new();
        store
            .insert_user("Ana", "ana@example.com", "hash", true, &[Role::Admin])
            .await;

        let err = store
            .create_client(NewClient {
                name: "Other".to_string(),
                email: "ANA@example.com".to_string(),
                password_hash: "hash".to_string(),
                phone: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_identity_reflects_synced_grants() {
        let store = InMemoryStore::new();
        let id = store
            .insert_user("Eve", "eve@example.com", "hash", true, &[Role::Employee])
            .await;

        store
            .sync_permissions(Role::Employee, &[Permission::UsersView])
            .await
            .unwrap();

        let identity = store.load_identity(id).await.unwrap().unwrap();
        assert!(identity.has_permission(Permission::UsersView));
        assert!(!identity.has_permission(Permission::SalesView));
    }

    #[tokio::test]
    async fn test_assign_roles_keeps_order() {
        let store = InMemoryStore::new();
        let id = store
            .insert_user("Eve", "eve@example.com", "hash", true, &[Role::Client])
            .await;

        let roles = store
            .assign_roles(id, &[Role::Employee, Role::Admin, Role::Employee])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(roles, vec![Role::Employee, Role::Admin]);

        assert!(store.assign_roles(UserId::new(999), &[Role::Admin]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user_clears_phone_when_empty() {
        let store = InMemoryStore::new();
        let id = store
            .insert_user("Eve", "eve@example.com", "hash", true, &[Role::Client])
            .await;

        let set = UpdateUserDto {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        let user = store.update_user(id, set).await.unwrap().unwrap();
        assert_eq!(user.phone.as_deref(), Some("555-0100"));

        let untouched = store
            .update_user(id, UpdateUserDto::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.phone.as_deref(), Some("555-0100"));

        let cleared = UpdateUserDto {
            phone: Some(String::new()),
            ..Default::default()
        };
        let user = store.update_user(id, cleared).await.unwrap().unwrap();
        assert_eq!(user.phone, None);
    }

    #[tokio::test]
    async fn test_metrics_respect_range() {
        let store = InMemoryStore::new();
        let day = |s: &str| s.parse::<NaiveDate>().unwrap();

        store.add_sale(SaleStatus::Paid, 1_000, day("2025-01-10")).await;
        store.add_sale(SaleStatus::Paid, 9_999, day("2024-12-31")).await;
        store.add_sale(SaleStatus::Pending, 500, day("2025-01-11")).await;
        store.add_product(2, 5).await;
        store.add_product(10, 5).await;
        store.add_pqrs(PqrsStatus::Open, day("2025-01-15")).await;

        let metrics = store
            .metrics(DateRange {
                from: day("2025-01-01"),
                to: day("2025-01-31"),
            })
            .await
            .unwrap();

        assert_eq!(metrics.paid_revenue_cents, 1_000);
        assert_eq!(metrics.sales_by_status[0].count, 1);
        assert_eq!(metrics.products_total, 2);
        assert_eq!(metrics.products_low_stock, 1);
        assert_eq!(metrics.pqrs_by_status[0].count, 1);
        assert_eq!(metrics.pqrs_by_status[2].count, 0);
    }
}
