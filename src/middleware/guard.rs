use axum::{
    extract::{FromRequestParts, MatchedPath, RawPathParams, Request},
    middleware::Next,
    response::Response,
};
use storehub_auth::{Guard, is_self_profile_view};
use storehub_core::AppError;
use storehub_observability::track_authorization_denied;
use tracing::{debug, warn};

use crate::middleware::auth::authorization;
use crate::router::route_name;

/// Builds a route layer that runs one [`Guard`].
///
/// ```rust,ignore
/// Router::new()
///     .route("/dashboard", get(show_dashboard))
///     .route_layer(guard!(Guard::DashboardAccess));
/// ```
#[macro_export]
macro_rules! guard {
    ($guard:expr) => {
        axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                $crate::middleware::guard::require(req, next, $guard)
            },
        )
    };
}

/// Runs `guard` against the attached identity. Denials are logged and
/// counted, then answered with 403 and the guard's message.
pub async fn require(req: Request, next: Next, guard: Guard) -> Result<Response, AppError> {
    let auth = authorization(req.extensions());

    if let Err(err) = guard.check(&auth) {
        warn!(
            guard = %guard,
            user_id = ?auth.user_id(),
            method = %req.method(),
            path = %req.uri().path(),
            "Authorization denied"
        );
        track_authorization_denied(guard.kind());
        return Err(err);
    }

    Ok(next.run(req).await)
}

/// The user-management stage.
///
/// Requires [`Guard::ManageUsers`] except for a user viewing their own
/// profile through `users.show`.
pub async fn require_user_management(req: Request, next: Next) -> Result<Response, AppError> {
    let auth = authorization(req.extensions());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| route_name(req.method(), path.as_str()));

    let (mut parts, body) = req.into_parts();
    let subject = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(key, _)| *key == "user")
                .map(|(_, value)| value.to_string())
        });
    let req = Request::from_parts(parts, body);

    if is_self_profile_view(req.method(), route, subject.as_deref(), auth.user_id()) {
        debug!(user_id = ?auth.user_id(), "Self-service profile view");
        return Ok(next.run(req).await);
    }

    require(req, next, Guard::ManageUsers).await
}
