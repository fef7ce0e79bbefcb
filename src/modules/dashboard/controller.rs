use axum::extract::{Query, State};
use chrono::Utc;
use storehub_core::AppError;
use storehub_models::DateRangeParams;
use tracing::instrument;

use super::service::DashboardService;
use crate::middleware::auth::Auth;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::page::Page;

/// Dashboard metrics for a date range
///
/// Defaults to the last 30 days ending today. Each block is only present
/// when the user may see it.
#[utoipa::path(
    get,
    path = "/dashboard",
    params(DateRangeParams),
    responses(
        (status = 200, description = "Dashboard page object; `props.metrics` is a DashboardView", body = Page),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "No dashboard access", body = ErrorResponse),
        (status = 422, description = "`from` is after `to`", body = ErrorResponse)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state, auth))]
pub async fn show_dashboard(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Query(params): Query<DateRangeParams>,
) -> Result<Page, AppError> {
    let today = Utc::now().date_naive();
    let (range, metrics) =
        DashboardService::metrics(state.dashboard.as_ref(), &params, today).await?;

    Page::new("Dashboard", &auth)?
        .with("range", range)?
        .with("metrics", DashboardService::shape(&auth, range, metrics))
}
