//! Session layer construction.
//!
//! Sessions are cookie-identified records kept in PostgreSQL
//! (`tower_sessions` table). They expire after `SESSION_IDLE_MINUTES` of
//! inactivity unless the user asked to be remembered at login.

use sqlx::PgPool;
use storehub_config::SessionConfig;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

pub const SESSION_COOKIE: &str = "storehub_session";

/// Cookie and expiry settings shared by every store.
pub fn session_layer<S>(store: S, config: &SessionConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(idle_timeout(config)))
}

pub fn idle_timeout(config: &SessionConfig) -> Duration {
    Duration::minutes(config.idle_minutes)
}

/// Expiry applied when the user ticks "remember me".
pub fn remember_expiry(config: &SessionConfig) -> Expiry {
    Expiry::OnInactivity(Duration::days(config.remember_days))
}

pub async fn build_postgres_session_layer(
    pool: PgPool,
    config: &SessionConfig,
) -> anyhow::Result<SessionManagerLayer<PostgresStore>> {
    let store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|err| anyhow::anyhow!("invalid session table name: {err}"))?;

    store.migrate().await?;

    Ok(session_layer(store, config))
}
