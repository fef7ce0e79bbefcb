use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use storehub::router::init_router;
use storehub::session::build_postgres_session_layer;
use storehub::state::AppState;
use storehub::store::PgStore;
use storehub_config::{AuthConfig, CorsConfig, ServerConfig, SessionConfig};
use storehub_db::{init_db_pool, run_migrations};
use storehub_observability::{init_metrics, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server = ServerConfig::from_env();
    let metrics = if server.metrics_enabled {
        Some(init_metrics()?)
    } else {
        None
    };

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let session_config = SessionConfig::from_env();
    let session_layer = build_postgres_session_layer(pool.clone(), &session_config).await?;

    let state = AppState::from_store(Arc::new(PgStore::new(pool)))
        .with_auth_config(AuthConfig::from_env())
        .with_session_config(session_config)
        .with_cors_config(CorsConfig::from_env())
        .with_metrics(metrics);
    let app = init_router(state, session_layer);

    let address = server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "StoreHub listening");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
