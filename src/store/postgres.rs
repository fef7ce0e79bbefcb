//! PostgreSQL-backed repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use storehub_auth::Identity;
use storehub_core::{AppError, PaginationMeta, Permission, Role};
use storehub_models::{
    Customer, DashboardMetrics, DateRange, NewClient, PaginatedUsersResponse,
    RoleWithPermissions, StatusCount, StatusTotal, UpdateUserDto, User, UserCredentials,
    UserFilterParams, UserId, UserWithRoles,
};
use tracing::instrument;

use super::{
    DashboardRepository, RoleRepository, UserRepository, build_identity, fill_pqrs, fill_sales,
    paid_revenue, parse_keys,
};

const USER_COLUMNS: &str = "id, name, email, phone, active, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn roles_of(&self, id: UserId) -> Result<Vec<Role>, AppError> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT role_key FROM user_roles WHERE user_id = $1 ORDER BY assigned_at, role_key",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(parse_keys(keys))
    }

    async fn customer_of(&self, id: UserId) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, user_id, code, name, email, phone, created_at FROM customers WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }
}

/// Maps a unique-constraint violation to 409, everything else to 500.
fn conflict_on_unique(err: sqlx::Error, message: &'static str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(anyhow::anyhow!(message))
        }
        _ => AppError::internal(err),
    }
}

#[async_trait]
impl UserRepository for PgStore {
    #[instrument(skip(self))]
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, password, active FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(self))]
    async fn load_identity(&self, id: UserId) -> Result<Option<Identity>, AppError> {
        let Some(user) = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let roles = self.roles_of(id).await?;
        let grants = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT rp.permission_key
            FROM role_permissions rp
            INNER JOIN user_roles ur ON ur.role_key = rp.role_key
            WHERE ur.user_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(build_identity(
            &user,
            roles,
            parse_keys::<Permission>(grants),
        )))
    }

    #[instrument(skip(self, client), fields(email = %client.email))]
    async fn create_client(&self, client: NewClient) -> Result<(User, Customer), AppError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password, phone, active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.password_hash)
        .bind(&client.phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| conflict_on_unique(err, "The email has already been taken."))?;

        sqlx::query("INSERT INTO user_roles (user_id, role_key) VALUES ($1, $2)")
            .bind(user.id)
            .bind(Role::Client.key())
            .execute(&mut *tx)
            .await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (user_id, code, name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, code, name, email, phone, created_at
            "#,
        )
        .bind(user.id)
        .bind(Customer::code_for(user.id))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, customer))
    }

    #[instrument(skip(self))]
    async fn list_users(
        &self,
        filter: &UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let role = filter.role.as_deref().filter(|s| !s.is_empty());

        const WHERE: &str = r#"
            WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR email ILIKE $1)
              AND ($2::TEXT IS NULL OR EXISTS (
                  SELECT 1 FROM user_roles ur WHERE ur.user_id = users.id AND ur.role_key = $2
              ))
        "#;

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM users {WHERE}"))
            .bind(&search)
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users {WHERE} ORDER BY id LIMIT $3 OFFSET $4"
        ))
        .bind(&search)
        .bind(role)
        .bind(filter.pagination.limit())
        .bind(filter.pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<UserId> = users.iter().map(|user| user.id).collect();

        let role_rows = sqlx::query_as::<_, (UserId, String)>(
            "SELECT user_id, role_key FROM user_roles WHERE user_id = ANY($1) ORDER BY assigned_at, role_key",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut roles_by_user: HashMap<UserId, Vec<String>> = HashMap::new();
        for (user_id, key) in role_rows {
            roles_by_user.entry(user_id).or_default().push(key);
        }

        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, user_id, code, name, email, phone, created_at FROM customers WHERE user_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut customers_by_user: HashMap<UserId, Customer> = customers
            .into_iter()
            .filter_map(|customer| customer.user_id.map(|user_id| (user_id, customer)))
            .collect();

        let data = users
            .into_iter()
            .map(|user| UserWithRoles {
                roles: parse_keys(roles_by_user.remove(&user.id).unwrap_or_default()),
                customer: customers_by_user.remove(&user.id),
                user,
            })
            .collect();

        Ok(PaginatedUsersResponse {
            data,
            meta: PaginationMeta::new(total, &filter.pagination),
        })
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: UserId) -> Result<Option<UserWithRoles>, AppError> {
        let Some(user) = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        Ok(Some(UserWithRoles {
            roles: self.roles_of(id).await?,
            customer: self.customer_of(id).await?,
            user,
        }))
    }

    #[instrument(skip(self, dto))]
    async fn update_user(&self, id: UserId, dto: UpdateUserDto) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = CASE WHEN $4::VARCHAR IS NULL THEN phone ELSE NULLIF($4, '') END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name)
        .bind(dto.email)
        .bind(dto.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| conflict_on_unique(err, "The email has already been taken."))?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: UserId, active: bool) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn assign_roles(&self, id: UserId, roles: &[Role]) -> Result<Option<Vec<Role>>, AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Ok(None);
        }

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut assigned = Vec::with_capacity(roles.len());
        for role in roles {
            if assigned.contains(role) {
                continue;
            }
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_key, assigned_at) VALUES ($1, $2, clock_timestamp())",
            )
            .bind(id)
            .bind(role.key())
            .execute(&mut *tx)
            .await?;
            assigned.push(*role);
        }

        tx.commit().await?;

        Ok(Some(assigned))
    }
}

#[async_trait]
impl RoleRepository for PgStore {
    #[instrument(skip(self))]
    async fn grants(&self, role: Role) -> Result<Vec<Permission>, AppError> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT permission_key FROM role_permissions WHERE role_key = $1",
        )
        .bind(role.key())
        .fetch_all(&self.pool)
        .await?;

        Ok(parse_keys(keys))
    }

    #[instrument(skip(self))]
    async fn all_grants(&self) -> Result<Vec<RoleWithPermissions>, AppError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT role_key, permission_key FROM role_permissions",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_role: HashMap<String, Vec<String>> = HashMap::new();
        for (role_key, permission_key) in rows {
            by_role.entry(role_key).or_default().push(permission_key);
        }

        Ok(Role::ALL
            .iter()
            .map(|role| {
                let keys = by_role.remove(role.key()).unwrap_or_default();
                RoleWithPermissions::new(*role, parse_keys(keys))
            })
            .collect())
    }

    #[instrument(skip(self, permissions), fields(count = permissions.len()))]
    async fn sync_permissions(
        &self,
        role: Role,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_key = $1")
            .bind(role.key())
            .execute(&mut *tx)
            .await?;

        let keys: Vec<&str> = permissions.iter().map(|p| p.key()).collect();
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_key, permission_key)
            SELECT $1, UNNEST($2::VARCHAR[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role.key())
        .bind(&keys)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.grants(role).await
    }
}

#[async_trait]
impl DashboardRepository for PgStore {
    #[instrument(skip(self))]
    async fn metrics(&self, range: DateRange) -> Result<DashboardMetrics, AppError> {
        let sales = sqlx::query_as::<_, StatusTotal>(
            r#"
            SELECT status, COUNT(*) AS count, COALESCE(SUM(total_cents), 0)::BIGINT AS total_cents
            FROM sales_notes
            WHERE issued_on BETWEEN $1 AND $2
            GROUP BY status
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;
        let sales_by_status = fill_sales(sales);

        let (customers_total, customers_new) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE created_at::DATE BETWEEN $1 AND $2)
            FROM customers
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_one(&self.pool)
        .await?;

        let (products_total, products_low_stock) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE stock <= min_stock) FROM products",
        )
        .fetch_one(&self.pool)
        .await?;

        let pqrs = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM pqrs
            WHERE created_at::DATE BETWEEN $1 AND $2
            GROUP BY status
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardMetrics {
            paid_revenue_cents: paid_revenue(&sales_by_status),
            sales_by_status,
            customers_total,
            customers_new,
            products_total,
            products_low_stock,
            pqrs_by_status: fill_pqrs(pqrs),
        })
    }
}
