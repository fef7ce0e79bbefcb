use serde::Serialize;
use storehub_models::{DateRange, StatusCount, StatusTotal};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SalesBlock {
    pub by_status: Vec<StatusTotal>,
    pub paid_revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClientsBlock {
    pub total: i64,
    /// Customers created inside the range
    pub new_in_range: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InventoryBlock {
    pub products_total: i64,
    /// Products with `stock <= min_stock`
    pub low_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PqrsBlock {
    pub by_status: Vec<StatusCount>,
}

/// The dashboard as one user is allowed to see it. Blocks the user may not
/// see are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardView {
    pub range: DateRange,
    pub sales: Option<SalesBlock>,
    pub clients: Option<ClientsBlock>,
    pub inventory: Option<InventoryBlock>,
    pub pqrs: Option<PqrsBlock>,
    pub can_export: bool,
}
