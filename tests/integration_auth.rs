mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::TestApp;
use serde_json::json;
use storehub_core::Role;

#[tokio::test]
async fn test_me_answers_guests() {
    let mut app = TestApp::new();

    let response = app.get("/me").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["user"].is_null());
    assert_eq!(response.body["roles"], json!([]));
    assert_eq!(response.body["is_admin"], false);
    assert_eq!(response.body["can_access_dashboard"], false);
}

#[tokio::test]
async fn test_login_success_signs_in() {
    let mut app = TestApp::new();
    app.create_user("Ana", "ana@example.com", true, &[Role::Employee])
        .await;

    let response = app.login("ANA@example.com").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/dashboard"));

    let me = app.get("/me").await;
    assert_eq!(me.body["user"]["email"], "ana@example.com");
    assert_eq!(me.body["primary_role"], "employee");
    assert_eq!(me.body["can_access_dashboard"], true);
}

#[tokio::test]
async fn test_login_wrong_password_flashes_generic_error() {
    let mut app = TestApp::new();
    app.create_user("Ana", "ana@example.com", true, &[Role::Employee])
        .await;

    let response = app
        .post_form("/login", &[("email", "ana@example.com"), ("password", "wrong-password")])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let page = app.get("/login").await;
    assert_eq!(page.body["component"], "Auth/Login");
    assert_eq!(
        page.body["props"]["errors"]["email"][0],
        "These credentials do not match our records."
    );
    assert_eq!(page.body["props"]["old"]["email"], "ana@example.com");

    // Flashed values are consumed by the first read.
    let again = app.get("/login").await;
    assert_eq!(again.body["props"]["errors"], json!({}));
}

#[tokio::test]
async fn test_inactive_admin_is_rejected_with_status_message() {
    let mut app = TestApp::new();
    app.create_user("Old Admin", "old@example.com", false, &[Role::Admin])
        .await;

    let response = app.login("old@example.com").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let me = app.get("/me").await;
    assert!(me.body["user"].is_null());

    let page = app.get("/login").await;
    let message = page.body["props"]["errors"]["email"][0].as_str().unwrap();
    assert!(message.contains("inactive"));
}

#[tokio::test]
async fn test_login_validation_errors_are_field_scoped() {
    let mut app = TestApp::new();

    let response = app
        .post_form("/login", &[("email", "not-an-email"), ("password", "")])
        .await;
    assert_eq!(response.location.as_deref(), Some("/login"));

    let page = app.get("/login").await;
    assert!(page.body["props"]["errors"]["email"].is_array());
    assert!(page.body["props"]["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_redirects_follow_role() {
    let mut app = TestApp::new();
    app.create_user("Client", "client@example.com", true, &[Role::Client])
        .await;
    let client = app.login("client@example.com").await;
    assert_eq!(client.location.as_deref(), Some("/"));

    let mut app = TestApp::new();
    app.create_user("Admin", "admin@example.com", true, &[Role::Admin])
        .await;
    let admin = app.login("admin@example.com").await;
    assert_eq!(admin.location.as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn test_guest_get_remembers_intended_url() {
    let mut app = TestApp::new();
    app.create_user("Admin", "admin@example.com", true, &[Role::Admin])
        .await;

    let response = app.get("/users?page=2").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let login = app.login("admin@example.com").await;
    assert_eq!(login.location.as_deref(), Some("/users?page=2"));
}

#[tokio::test]
async fn test_guest_non_get_is_unauthorized() {
    let mut app = TestApp::new();

    let response = app
        .json(Method::PUT, "/roles/employee/permissions", json!({ "permissions": [] }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let logout = app.post_form("/logout", &[]).await;
    assert_eq!(logout.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_in_users_skip_guest_pages() {
    let mut app = TestApp::new();
    app.login_as("client@example.com", &[Role::Client]).await;

    let response = app.get("/login").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn test_logout_flushes_session() {
    let mut app = TestApp::new();
    app.login_as("employee@example.com", &[Role::Employee]).await;

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    let me = app.get("/me").await;
    assert!(me.body["user"].is_null());
}

#[tokio::test]
async fn test_registration_creates_client_with_one_customer() {
    let mut app = TestApp::new();

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Nueva Cliente"),
                ("email", "nueva@example.com"),
                ("password", "long-enough"),
                ("password_confirmation", "long-enough"),
                ("terms", "true"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    let me = app.get("/me").await;
    assert_eq!(me.body["roles"], json!(["client"]));
    assert_eq!(me.body["is_client"], true);
    let id = me.body["user"]["id"].as_i64().unwrap();

    let customers = app.store.customers_of(id.into()).await;
    assert_eq!(customers.len(), 1);
    assert!(customers[0].code.contains(&id.to_string()));

    let home = app.get("/").await;
    assert_eq!(
        home.body["props"]["flash"]["success"],
        "Registration successful. Welcome to StoreHub!"
    );
}

#[tokio::test]
async fn test_registration_rejects_taken_email_and_bad_input() {
    let mut app = TestApp::new();
    app.create_user("Taken", "taken@example.com", true, &[Role::Client])
        .await;

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Someone"),
                ("email", "taken@example.com"),
                ("password", "long-enough"),
                ("password_confirmation", "long-enough"),
                ("terms", "true"),
            ],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/register"));

    let page = app.get("/register").await;
    assert_eq!(
        page.body["props"]["errors"]["email"][0],
        "The email has already been taken."
    );

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Someone"),
                ("email", "someone@example.com"),
                ("password", "long-enough"),
                ("password_confirmation", "different"),
            ],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/register"));

    let page = app.get("/register").await;
    assert!(page.body["props"]["errors"]["password"].is_array());
    assert!(page.body["props"]["errors"]["terms"].is_array());
}

#[tokio::test]
async fn test_browser_checkbox_values_are_accepted() {
    let mut app = TestApp::new();

    let register = app
        .post_form(
            "/register",
            &[
                ("name", "Nueva Cliente"),
                ("email", "Nueva@Example.com"),
                ("password", "long-enough"),
                ("password_confirmation", "long-enough"),
                ("terms", "on"),
            ],
        )
        .await;
    assert_eq!(register.status, StatusCode::SEE_OTHER);
    assert_eq!(register.location.as_deref(), Some("/"));

    let me = app.get("/me").await;
    assert_eq!(me.body["user"]["email"], "nueva@example.com");

    let mut app = TestApp::new();
    app.create_user("Eve", "eve@example.com", true, &[Role::Employee])
        .await;

    let login = app
        .post_form(
            "/login",
            &[
                ("email", "eve@example.com"),
                ("password", common::PASSWORD),
                ("remember", "on"),
            ],
        )
        .await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    assert_eq!(login.location.as_deref(), Some("/dashboard"));

    let me = app.get("/me").await;
    assert_eq!(me.body["user"]["email"], "eve@example.com");
}

#[tokio::test]
async fn test_registration_with_case_variant_email_is_taken() {
    let mut app = TestApp::new();
    app.create_user("Ana", "ana@example.com", true, &[Role::Client])
        .await;

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Other Ana"),
                ("email", "ANA@Example.com"),
                ("password", "long-enough"),
                ("password_confirmation", "long-enough"),
                ("terms", "on"),
            ],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/register"));

    let page = app.get("/register").await;
    assert_eq!(
        page.body["props"]["errors"]["email"][0],
        "The email has already been taken."
    );
}

#[tokio::test]
async fn test_missing_or_unreadable_fields_are_flashed() {
    let mut app = TestApp::new();

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Someone"),
                ("email", "someone@example.com"),
                ("password", "long-enough"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/register"));

    let page = app.get("/register").await;
    assert!(page.body["props"]["errors"]["password"].is_array());
    assert!(page.body["props"]["errors"]["terms"].is_array());
    assert_eq!(page.body["props"]["old"]["email"], "someone@example.com");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("email=eve@example.com"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let page = app.get("/login").await;
    assert!(page.body["props"]["errors"]["form"].is_array());
}
