use anyhow::anyhow;
use chrono::NaiveDate;
use storehub_auth::Authorization;
use storehub_core::{AppError, Permission};
use storehub_models::{DashboardMetrics, DateRange, DateRangeParams};
use tracing::instrument;

use super::model::{ClientsBlock, DashboardView, InventoryBlock, PqrsBlock, SalesBlock};
use crate::store::DashboardRepository;

pub struct DashboardService;

impl DashboardService {
    /// Resolves the requested range against `today` and reads the
    /// aggregates for it. An inverted range is a 422.
    #[instrument(skip(repo))]
    pub async fn metrics(
        repo: &dyn DashboardRepository,
        params: &DateRangeParams,
        today: NaiveDate,
    ) -> Result<(DateRange, DashboardMetrics), AppError> {
        let range = params.resolve(today).ok_or_else(|| {
            AppError::unprocessable(anyhow!("The from date must be on or before the to date."))
        })?;

        let metrics = repo.metrics(range).await?;
        Ok((range, metrics))
    }

    /// Keeps the blocks the user may see. Administrators see every block.
    pub fn shape(auth: &Authorization, range: DateRange, metrics: DashboardMetrics) -> DashboardView {
        let admin = auth.is_admin();
        let allowed = |permissions: &[Permission]| admin || auth.has_any_permission(permissions);

        DashboardView {
            range,
            sales: allowed(&[Permission::SalesView]).then(|| SalesBlock {
                by_status: metrics.sales_by_status,
                paid_revenue_cents: metrics.paid_revenue_cents,
            }),
            clients: allowed(&[Permission::ClientsView]).then_some(ClientsBlock {
                total: metrics.customers_total,
                new_in_range: metrics.customers_new,
            }),
            inventory: allowed(&[Permission::InventoryView, Permission::ProductsView]).then_some(
                InventoryBlock {
                    products_total: metrics.products_total,
                    low_stock: metrics.products_low_stock,
                },
            ),
            pqrs: allowed(&[Permission::PqrsView]).then(|| PqrsBlock {
                by_status: metrics.pqrs_by_status,
            }),
            can_export: allowed(&[Permission::ReportsExport]),
        }
    }
}
