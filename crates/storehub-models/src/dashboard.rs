//! Dashboard date ranges and aggregates.
//!
//! [`DashboardMetrics`] is the raw read from storage. What a given user gets
//! to see of it is decided by the dashboard handler.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Length of the default window, today included.
pub const DEFAULT_RANGE_DAYS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Paid,
    Cancelled,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 3] = [SaleStatus::Pending, SaleStatus::Paid, SaleStatus::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Paid => "paid",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PqrsStatus {
    Open,
    InProgress,
    Resolved,
}

impl PqrsStatus {
    pub const ALL: [PqrsStatus; 3] = [PqrsStatus::Open, PqrsStatus::InProgress, PqrsStatus::Resolved];

    pub fn as_str(self) -> &'static str {
        match self {
            PqrsStatus::Open => "open",
            PqrsStatus::InProgress => "in_progress",
            PqrsStatus::Resolved => "resolved",
        }
    }
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both optional.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRangeParams {
    /// Fills in the defaults relative to `today`.
    ///
    /// `to` defaults to `today` and `from` to the start of the 30-day window
    /// ending at `to`. Returns `None` when `from` is after `to`.
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        let to = self.to.unwrap_or(today);
        let from = self.from.unwrap_or_else(|| {
            to.checked_sub_days(Days::new(DEFAULT_RANGE_DAYS - 1))
                .unwrap_or(NaiveDate::MIN)
        });

        (from <= to).then_some(DateRange { from, to })
    }
}

/// Count and summed total of sales notes in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusTotal {
    pub status: String,
    pub count: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Everything the dashboard can show for a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetrics {
    pub sales_by_status: Vec<StatusTotal>,
    pub paid_revenue_cents: i64,
    pub customers_total: i64,
    pub customers_new: i64,
    pub products_total: i64,
    pub products_low_stock: i64,
    pub pqrs_by_status: Vec<StatusCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_range_is_last_30_days() {
        let range = DateRangeParams::default().resolve(date("2025-03-31")).unwrap();
        assert_eq!(range.to, date("2025-03-31"));
        assert_eq!(range.from, date("2025-03-02"));
    }

    #[test]
    fn test_explicit_range_is_kept() {
        let params = DateRangeParams {
            from: Some(date("2025-01-01")),
            to: Some(date("2025-01-01")),
        };
        let range = params.resolve(date("2025-06-01")).unwrap();
        assert_eq!(range.from, range.to);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let params = DateRangeParams {
            from: Some(date("2025-02-01")),
            to: Some(date("2025-01-01")),
        };
        assert_eq!(params.resolve(date("2025-06-01")), None);
    }

    #[test]
    fn test_status_keys() {
        assert_eq!(SaleStatus::Cancelled.as_str(), "cancelled");
        assert_eq!(PqrsStatus::InProgress.as_str(), "in_progress");
        assert_eq!(
            serde_json::to_string(&PqrsStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
    }
}
