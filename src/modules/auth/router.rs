use axum::{Router, middleware, routing::{get, post}};

use super::controller::{login, logout, register, show_login, show_register};
use crate::middleware::auth::{require_auth, require_guest};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    let guest = Router::new()
        .route("/login", get(show_login).post(login))
        .route("/register", get(show_register).post(register))
        .route_layer(middleware::from_fn(require_guest));

    let authenticated = Router::new()
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn(require_auth));

    guest.merge(authenticated)
}
