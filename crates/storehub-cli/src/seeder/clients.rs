//! Fake client accounts for local testing.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use storehub_core::{Role, hash_password_with_cost};
use storehub_models::{Customer, UserId};

use super::SeedResult;

/// Seeded accounts share one hash; the low cost keeps seeding fast.
const SEED_BCRYPT_COST: u32 = 4;

pub struct ClientSeed {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Generates `count` clients. `offset` keeps emails unique across runs.
pub fn generate_clients(count: usize, offset: i64) -> Vec<ClientSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+client{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                offset + idx as i64
            );

            ClientSeed {
                name: format!("{first_name} {last_name}"),
                email,
                phone: Some(PhoneNumber().fake()),
            }
        })
        .collect()
}

/// Inserts clients with their role and customer record, one transaction.
pub async fn seed_clients(db: &PgPool, count: usize, password: &str) -> SeedResult<Vec<UserId>> {
    let start_time = Instant::now();
    println!("🛒 Seeding {} clients...", count);

    let offset: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM users")
        .fetch_one(db)
        .await?;
    let password_hash =
        hash_password_with_cost(password, SEED_BCRYPT_COST).map_err(|e| e.error.to_string())?;
    let clients = generate_clients(count, offset);

    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(clients.len());
    for chunk in clients.chunks(BATCH_SIZE) {
        ids.extend(insert_clients_chunk(&mut tx, chunk, &password_hash).await?);
    }
    tx.commit().await?;

    println!("   ✓ Inserted {} clients in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

async fn insert_clients_chunk(
    tx: &mut Transaction<'_, Postgres>,
    clients: &[ClientSeed],
    password_hash: &str,
) -> SeedResult<Vec<UserId>> {
    if clients.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (name, email, password, phone) VALUES ");
    for i in 0..clients.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for client in clients {
        q = q
            .bind(&client.name)
            .bind(&client.email)
            .bind(password_hash)
            .bind(&client.phone);
    }
    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;

    for (id, client) in ids.iter().zip(clients) {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_key, assigned_at) VALUES ($1, $2, clock_timestamp())",
        )
        .bind(*id)
        .bind(Role::Client.key())
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO customers (user_id, code, name, email, phone) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(*id)
        .bind(Customer::code_for(*id))
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .execute(&mut **tx)
        .await?;
    }

    Ok(ids)
}
