use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use storehub_auth::SELF_SERVICE_ROUTE;
use storehub_observability::{PrometheusHandle, logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::auth::attach_identity;
use crate::modules::auth::router::init_auth_router;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::home::router::init_home_router;
use crate::modules::roles::router::init_roles_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

/// Route names keyed by method and matched path.
const NAMED_ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/", "home"),
    ("GET", "/me", "me"),
    ("GET", "/login", "login"),
    ("POST", "/login", "login.attempt"),
    ("GET", "/register", "register"),
    ("POST", "/register", "register.store"),
    ("POST", "/logout", "logout"),
    ("GET", "/dashboard", "dashboard"),
    ("GET", "/users", "users.index"),
    ("GET", "/users/{user}", SELF_SERVICE_ROUTE),
    ("PUT", "/users/{user}", "users.update"),
    ("DELETE", "/users/{user}", "users.destroy"),
    ("PATCH", "/users/{user}/status", "users.status"),
    ("PUT", "/users/{user}/roles", "users.roles"),
    ("GET", "/roles", "roles.index"),
    ("GET", "/roles/{role}", "roles.show"),
    ("PUT", "/roles/{role}/permissions", "roles.permissions"),
    ("GET", "/permissions", "permissions.index"),
];

/// The name of the route matched for `method` and `path` (the route
/// template, not the request path).
pub fn route_name(method: &Method, path: &str) -> Option<&'static str> {
    NAMED_ROUTES
        .iter()
        .find(|(m, p, _)| *m == method.as_str() && *p == path)
        .map(|(_, _, name)| *name)
}

fn metrics_router(handle: PrometheusHandle) -> Router<AppState> {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Builds the application.
///
/// Layers run outermost first: metrics, request logging, CORS, the session,
/// then identity attachment. Route-level stages (authentication and guards)
/// run after routing.
pub fn init_router<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let mut app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_home_router())
        .merge(init_auth_router())
        .merge(init_dashboard_router())
        .merge(init_users_router())
        .merge(init_roles_router());

    if let Some(handle) = state.metrics.clone() {
        app = app.merge(metrics_router(handle));
    }

    app.layer(middleware::from_fn_with_state(state.clone(), attach_identity))
        .layer(session_layer)
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_route_names() {
        assert_eq!(route_name(&Method::GET, "/users/{user}"), Some("users.show"));
        assert_eq!(route_name(&Method::PUT, "/users/{user}"), Some("users.update"));
        assert_eq!(route_name(&Method::GET, "/users/7"), None);
        assert_eq!(route_name(&Method::POST, "/dashboard"), None);
    }

    #[test]
    fn test_named_routes_are_unique() {
        let keys: HashSet<(&str, &str)> = NAMED_ROUTES.iter().map(|(m, p, _)| (*m, *p)).collect();
        assert_eq!(keys.len(), NAMED_ROUTES.len());

        let names: HashSet<&str> = NAMED_ROUTES.iter().map(|(_, _, n)| *n).collect();
        assert_eq!(names.len(), NAMED_ROUTES.len());
    }
}
