use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{Extensions, Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use storehub_auth::{Authorization, home_for};
use storehub_core::AppError;
use storehub_models::UserId;
use tower_sessions::Session;
use tracing::{debug, info};

use crate::state::AppState;

/// Session key holding the signed-in user's id.
pub const SESSION_USER_KEY: &str = "auth.user_id";
/// Session key holding the URL a guest tried to reach before logging in.
pub const SESSION_INTENDED_KEY: &str = "auth.intended_url";

pub const LOGIN_PATH: &str = "/login";

/// The facade attached to a request, or a guest one.
pub fn authorization(extensions: &Extensions) -> Authorization {
    extensions.get::<Authorization>().cloned().unwrap_or_default()
}

/// Loads the session's identity and attaches an [`Authorization`] to the
/// request. Guests get an empty one; nothing is rejected here. A session
/// whose account has since been deactivated is flushed and treated as a
/// guest.
pub async fn attach_identity(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = match session.get::<UserId>(SESSION_USER_KEY).await? {
        Some(user_id) => match state.users.load_identity(user_id).await? {
            Some(identity) if identity.active => Authorization::new(identity),
            Some(_) => {
                info!(%user_id, "Account deactivated, ending its session");
                session.flush().await?;
                Authorization::guest()
            }
            None => {
                debug!(%user_id, "Session refers to a missing user, dropping it");
                session.remove::<UserId>(SESSION_USER_KEY).await?;
                Authorization::guest()
            }
        },
        None => Authorization::guest(),
    };

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

/// Rejects guests. A `GET` remembers where the guest was going and
/// redirects to the login page; other methods get a 401.
pub async fn require_auth(session: Session, req: Request, next: Next) -> Result<Response, AppError> {
    if authorization(req.extensions()).is_authenticated() {
        return Ok(next.run(req).await);
    }

    if *req.method() == Method::GET {
        let uri = req
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| req.uri().clone());
        let intended = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        session.insert(SESSION_INTENDED_KEY, intended).await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    Err(AppError::unauthorized("Unauthenticated."))
}

/// Login and registration pages: signed-in users are sent to their landing
/// page instead.
pub async fn require_guest(req: Request, next: Next) -> Response {
    let auth = authorization(req.extensions());
    if auth.is_authenticated() {
        return Redirect::to(home_for(&auth)).into_response();
    }
    next.run(req).await
}

/// Extractor for the current request's [`Authorization`].
///
/// Never fails: without `attach_identity` upstream it yields a guest.
#[derive(Debug, Clone)]
pub struct Auth(pub Authorization);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Auth(authorization(&parts.extensions)))
    }
}

/// Extractor for handlers behind `require_auth`: the facade plus the
/// signed-in user's id.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub auth: Authorization,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = authorization(&parts.extensions);
        let id = auth
            .user_id()
            .ok_or_else(|| AppError::unauthorized("Unauthenticated."))?;
        Ok(CurrentUser { id, auth })
    }
}
