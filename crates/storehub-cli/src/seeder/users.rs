//! Super administrator bootstrap.

use sqlx::PgPool;
use storehub_core::{Role, hash_password};
use storehub_models::UserId;

use super::SeedResult;
use super::catalog::seed_catalog;

/// Creates an active identity holding only `super_admin`.
///
/// The catalog is seeded first so the role row exists.
pub async fn create_super_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> SeedResult<UserId> {
    let email = email.trim().to_lowercase();
    if name.trim().is_empty() || !email.contains('@') {
        return Err("A name and a valid email are required".into());
    }
    if password.len() < 8 {
        return Err("The password must be at least 8 characters".into());
    }

    seed_catalog(db).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = $1)")
            .bind(&email)
            .fetch_one(db)
            .await?;
    if exists {
        return Err(format!("A user with email {email} already exists").into());
    }

    let password_hash = hash_password(password).map_err(|e| e.error.to_string())?;

    let mut tx = db.begin().await?;
    let id: UserId = sqlx::query_scalar(
        "INSERT INTO users (name, email, password, active) VALUES ($1, $2, $3, TRUE) RETURNING id",
    )
    .bind(name.trim())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_roles (user_id, role_key) VALUES ($1, $2)")
        .bind(id)
        .bind(Role::SuperAdmin.key())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(id)
}
