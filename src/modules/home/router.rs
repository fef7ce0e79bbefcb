use axum::{Router, routing::get};

use super::controller::{home, me};
use crate::state::AppState;

pub fn init_home_router() -> Router<AppState> {
    Router::new().route("/", get(home)).route("/me", get(me))
}
