use axum::{Router, middleware, routing::get};
use storehub_auth::Guard;

use super::controller::show_dashboard;
use crate::guard;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(show_dashboard))
        .route_layer(guard!(Guard::DashboardAccess))
        .route_layer(middleware::from_fn(require_auth))
}
