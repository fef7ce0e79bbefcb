//! Catalog mirroring.
//!
//! The `permissions` and `roles` tables mirror the compile-time catalogs so
//! foreign keys hold. A role's bundle is only written when it has none yet,
//! so bundles edited through role administration survive a reseed. The
//! `super_admin` bundle is always reset to the whole catalog.

use std::time::Instant;

use sqlx::PgPool;
use storehub_core::{Permission, Role};

use super::SeedResult;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub permissions: usize,
    pub stale_removed: u64,
    pub bundles_written: Vec<Role>,
}

/// The bundles written for roles that have none stored.
pub fn default_bundles() -> Vec<(Role, Vec<Permission>)> {
    Role::ALL
        .iter()
        .map(|role| (*role, role.default_permissions()))
        .collect()
}

pub async fn seed_catalog(db: &PgPool) -> SeedResult<CatalogReport> {
    let start_time = Instant::now();
    println!("📚 Seeding the role and permission catalogs...");

    let mut tx = db.begin().await?;

    for permission in Permission::ALL {
        sqlx::query(
            r#"INSERT INTO permissions (key, label, category)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET label = EXCLUDED.label, category = EXCLUDED.category"#,
        )
        .bind(permission.key())
        .bind(permission.label())
        .bind(permission.category().key())
        .execute(&mut *tx)
        .await?;
    }

    let keys: Vec<String> = Permission::ALL.iter().map(|p| p.key().to_string()).collect();
    let stale_removed = sqlx::query("DELETE FROM permissions WHERE key <> ALL($1)")
        .bind(&keys)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for role in Role::ALL {
        sqlx::query(
            r#"INSERT INTO roles (key, label, is_administrative)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET label = EXCLUDED.label, is_administrative = EXCLUDED.is_administrative"#,
        )
        .bind(role.key())
        .bind(role.label())
        .bind(role.is_administrative())
        .execute(&mut *tx)
        .await?;
    }

    let mut bundles_written = Vec::new();
    for (role, permissions) in default_bundles() {
        let stored: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM role_permissions WHERE role_key = $1")
                .bind(role.key())
                .fetch_one(&mut *tx)
                .await?;

        if stored > 0 && role.is_editable() {
            continue;
        }

        let keys: Vec<String> = permissions.iter().map(|p| p.key().to_string()).collect();
        sqlx::query("DELETE FROM role_permissions WHERE role_key = $1")
            .bind(role.key())
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"INSERT INTO role_permissions (role_key, permission_key)
            SELECT $1, UNNEST($2::VARCHAR[])"#,
        )
        .bind(role.key())
        .bind(&keys)
        .execute(&mut *tx)
        .await?;
        bundles_written.push(role);
    }

    tx.commit().await?;

    println!(
        "   ✓ {} permissions, {} roles ({} bundles written, {} stale keys removed) in {:?}",
        Permission::ALL.len(),
        Role::ALL.len(),
        bundles_written.len(),
        stale_removed,
        start_time.elapsed()
    );

    Ok(CatalogReport {
        permissions: Permission::ALL.len(),
        stale_removed,
        bundles_written,
    })
}
