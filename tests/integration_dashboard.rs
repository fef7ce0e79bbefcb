mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::TestApp;
use storehub::store::RoleRepository;
use storehub_core::{Permission, Role};
use storehub_models::{PqrsStatus, SaleStatus};

const RANGE: &str = "/dashboard?from=2025-03-01&to=2025-03-31";

fn day(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

async fn seed_activity(app: &TestApp) {
    app.store
        .add_sale(SaleStatus::Paid, 10_000, day("2025-03-05"))
        .await;
    app.store
        .add_sale(SaleStatus::Paid, 2_500, day("2025-03-31"))
        .await;
    app.store
        .add_sale(SaleStatus::Pending, 700, day("2025-03-10"))
        .await;
    // Outside the range
    app.store
        .add_sale(SaleStatus::Paid, 99_999, day("2025-04-01"))
        .await;

    app.store.add_product(2, 5).await;
    app.store.add_product(5, 5).await;
    app.store.add_product(10, 1).await;

    app.store
        .add_pqrs(PqrsStatus::Open, day("2025-03-02"))
        .await;
    app.store
        .add_pqrs(PqrsStatus::Resolved, day("2025-02-28"))
        .await;
}

#[tokio::test]
async fn test_admin_sees_every_block() {
    let mut app = TestApp::new();
    seed_activity(&app).await;
    app.login_as("admin@example.com", &[Role::Admin]).await;

    let response = app.get(RANGE).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["component"], "Dashboard");

    let props = &response.body["props"];
    assert_eq!(props["range"]["from"], "2025-03-01");
    assert_eq!(props["range"]["to"], "2025-03-31");

    let metrics = &props["metrics"];
    let sales = &metrics["sales"];
    assert_eq!(sales["paid_revenue_cents"], 12_500);
    assert_eq!(sales["by_status"][0]["status"], "pending");
    assert_eq!(sales["by_status"][0]["count"], 1);
    assert_eq!(sales["by_status"][1]["count"], 2);
    assert_eq!(sales["by_status"][2]["count"], 0);

    assert_eq!(metrics["inventory"]["products_total"], 3);
    assert_eq!(metrics["inventory"]["low_stock"], 2);

    assert_eq!(metrics["pqrs"]["by_status"][0]["status"], "open");
    assert_eq!(metrics["pqrs"]["by_status"][0]["count"], 1);
    assert_eq!(metrics["pqrs"]["by_status"][2]["count"], 0);

    assert!(metrics["clients"].is_object());
    assert_eq!(metrics["can_export"], true);
}

#[tokio::test]
async fn test_blocks_are_shaped_by_permissions() {
    let mut app = TestApp::new();
    seed_activity(&app).await;
    app.store
        .sync_permissions(
            Role::Employee,
            &[Permission::DashboardView, Permission::ProductsView, Permission::PqrsView],
        )
        .await
        .unwrap();
    app.login_as("employee@example.com", &[Role::Employee]).await;

    let response = app.get(RANGE).await;
    assert_eq!(response.status, StatusCode::OK);

    let metrics = &response.body["props"]["metrics"];
    assert!(metrics["sales"].is_null());
    assert!(metrics["clients"].is_null());
    assert_eq!(metrics["inventory"]["low_stock"], 2);
    assert_eq!(metrics["pqrs"]["by_status"][0]["count"], 1);
    assert_eq!(metrics["can_export"], false);
}

#[tokio::test]
async fn test_dashboard_requires_access() {
    let mut app = TestApp::new();
    app.login_as("client@example.com", &[Role::Client]).await;

    let response = app.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "You do not have access to the dashboard.");
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    let mut app = TestApp::new();
    app.login_as("admin@example.com", &[Role::Admin]).await;

    let response = app.get("/dashboard?from=2025-03-31&to=2025-03-01").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_default_range_is_last_thirty_days() {
    let mut app = TestApp::new();
    app.login_as("admin@example.com", &[Role::Admin]).await;

    let response = app.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::OK);

    let range = &response.body["props"]["range"];
    let from: NaiveDate = range["from"].as_str().unwrap().parse().unwrap();
    let to: NaiveDate = range["to"].as_str().unwrap().parse().unwrap();
    assert_eq!((to - from).num_days(), 29);
}

#[tokio::test]
async fn test_guest_is_sent_to_login() {
    let mut app = TestApp::new();

    let response = app.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));
}
