//! Legacy role reconciliation.
//!
//! Older deployments recorded roles by free-text name in
//! `legacy_role_assignments`. This imports every row whose name maps onto
//! the role catalog into `user_roles` and stamps it `reconciled_at`. Rows
//! with unrecognized names are reported and left untouched so they can be
//! fixed by hand and reconciled on a later run.

use std::time::Instant;

use sqlx::{FromRow, PgPool};
use storehub_core::Role;
use storehub_models::UserId;

use super::SeedResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LegacyAssignment {
    pub id: i64,
    pub user_id: UserId,
    pub role_name: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub scanned: usize,
    pub imported: usize,
    pub already_held: usize,
    /// `(row id, role name)` of rows that could not be mapped
    pub unknown: Vec<(i64, String)>,
}

/// Splits rows into mappable ones (with their role) and unknown ones.
pub fn plan(rows: Vec<LegacyAssignment>) -> (Vec<(LegacyAssignment, Role)>, Vec<LegacyAssignment>) {
    let mut mapped = Vec::new();
    let mut unknown = Vec::new();
    for row in rows {
        match Role::from_legacy_name(&row.role_name) {
            Some(role) => mapped.push((row, role)),
            None => unknown.push(row),
        }
    }
    (mapped, unknown)
}

pub async fn reconcile_legacy_roles(db: &PgPool, dry_run: bool) -> SeedResult<ReconcileReport> {
    let start_time = Instant::now();
    println!(
        "🔄 Reconciling legacy role assignments{}...",
        if dry_run { " (dry run)" } else { "" }
    );

    let roles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
        .fetch_one(db)
        .await?;
    if roles == 0 {
        return Err("The role catalog is empty. Run `seed-catalog` first.".into());
    }

    let rows: Vec<LegacyAssignment> = sqlx::query_as(
        r#"SELECT id, user_id, role_name
        FROM legacy_role_assignments
        WHERE reconciled_at IS NULL
        ORDER BY id"#,
    )
    .fetch_all(db)
    .await?;

    let mut report = ReconcileReport {
        scanned: rows.len(),
        ..Default::default()
    };
    let (mapped, unknown) = plan(rows);
    report.unknown = unknown.into_iter().map(|row| (row.id, row.role_name)).collect();

    let mut tx = db.begin().await?;
    for (row, role) in &mapped {
        let newly_assigned = if dry_run {
            let held: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role_key = $2)",
            )
            .bind(row.user_id)
            .bind(role.key())
            .fetch_one(&mut *tx)
            .await?;
            !held
        } else {
            let inserted = sqlx::query(
                r#"INSERT INTO user_roles (user_id, role_key, assigned_at)
                VALUES ($1, $2, clock_timestamp())
                ON CONFLICT (user_id, role_key) DO NOTHING"#,
            )
            .bind(row.user_id)
            .bind(role.key())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            sqlx::query("UPDATE legacy_role_assignments SET reconciled_at = NOW() WHERE id = $1")
                .bind(row.id)
                .execute(&mut *tx)
                .await?;
            inserted > 0
        };

        if newly_assigned {
            report.imported += 1;
        } else {
            report.already_held += 1;
        }
    }

    if dry_run {
        tx.rollback().await?;
    } else {
        tx.commit().await?;
    }

    println!(
        "   ✓ Scanned {} rows: {} imported, {} already held, {} unknown in {:?}",
        report.scanned,
        report.imported,
        report.already_held,
        report.unknown.len(),
        start_time.elapsed()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str) -> LegacyAssignment {
        LegacyAssignment {
            id,
            user_id: UserId::new(id * 10),
            role_name: name.to_string(),
        }
    }

    #[test]
    fn test_plan_splits_known_and_unknown_names() {
        let (mapped, unknown) = plan(vec![
            row(1, "Administrador"),
            row(2, "auditor"),
            row(3, "cliente"),
        ]);

        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].1, Role::Admin);
        assert_eq!(mapped[1].1, Role::Client);
        assert_eq!(unknown, vec![row(2, "auditor")]);
    }
}
