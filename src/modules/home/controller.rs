use axum::Json;
use storehub_auth::AuthSummary;
use storehub_core::AppError;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::auth::Auth;
use crate::utils::flash;
use crate::utils::page::Page;

/// Storefront landing page
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Home page object", body = Page)),
    tag = "Home"
)]
#[instrument(skip(auth, session))]
pub async fn home(Auth(auth): Auth, session: Session) -> Result<Page, AppError> {
    Page::new("Home", &auth)?.with_flashed(flash::take(&session).await?)
}

/// The current user's authorization summary
///
/// Guests get `user: null` and empty role and permission lists.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Authorization summary", body = AuthSummary)),
    tag = "Home"
)]
#[instrument(skip(auth))]
pub async fn me(Auth(auth): Auth) -> Json<AuthSummary> {
    Json(auth.summary())
}
