//! Integration tests for the session navigator over HTTP.

#![allow(clippy::unwrap_used)]

use bookstore_integration_tests::{ADMIN_ID, CUSTOMER_ID, TestApp, json_body};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_new_session_is_unauthenticated() {
    let app = TestApp::spawn().await;

    let body = json_body(app.get("/session").await).await;
    assert_eq!(body["flags"]["authenticated"], false);
    assert!(body["user"].is_null());
    assert_eq!(body["capabilities"], json!([]));
}

#[tokio::test]
async fn test_login_requires_role_first() {
    let app = TestApp::spawn().await;

    let resp = app
        .post("/session/login", &json!({ "user_id": CUSTOMER_ID }))
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["kind"], "role_not_selected");
}

#[tokio::test]
async fn test_login_with_wrong_role_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app.login("Customer", ADMIN_ID).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(resp).await;
    assert_eq!(body["kind"], "invalid_credentials");
    assert_eq!(body["message"], "Invalid User ID");

    // Role stays selected; the right ID now works.
    let resp = app
        .post("/session/login", &json!({ "user_id": "42" }))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_customer_login_lands_on_search() {
    let app = TestApp::spawn().await;

    let body = json_body(app.login("Customer", CUSTOMER_ID).await).await;
    assert_eq!(body["flags"]["authenticated"], true);
    assert_eq!(body["flags"]["search"], true);
    assert_eq!(body["flags"]["order"], true);
    assert_eq!(body["flags"]["manage_books"], false);
    assert_eq!(body["view"]["name"], "search");
    assert_eq!(body["user"]["display_name"], "Kim");
}

#[tokio::test]
async fn test_admin_login_lands_on_manage_books() {
    let app = TestApp::spawn().await;

    let body = json_body(app.login("Admin", ADMIN_ID).await).await;
    assert_eq!(body["flags"]["manage_books"], true);
    assert_eq!(body["flags"]["search"], false);
    assert_eq!(body["view"], json!({ "name": "manage_books", "mode": "browse" }));
}

#[tokio::test]
async fn test_non_numeric_login_id() {
    let app = TestApp::spawn().await;

    let resp = app.login("Admin", ADMIN_ID).await;
    assert_eq!(resp.status(), StatusCode::OK);
    app.post("/session/logout", &json!({})).await;

    app.post("/session/role", &json!({ "role": "Admin" })).await;
    let resp = app
        .post("/session/login", &json!({ "user_id": "seven" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_account_logs_in() {
    let app = TestApp::spawn().await;

    app.post("/session/role", &json!({ "role": "Customer" })).await;
    let body = json_body(app.post("/session/account/start", &json!({})).await).await;
    assert_eq!(body["flags"]["creating_account"], true);

    let resp = app
        .post(
            "/session/account",
            &json!({ "name": "Bo", "email": "bo@example.com", "id": "5" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["message"], "Customer account created successfully!");
    assert_eq!(body["data"]["UserID"], 5);
    assert_eq!(body["session"]["flags"]["authenticated"], true);
    assert_eq!(body["session"]["flags"]["creating_account"], false);
}

#[tokio::test]
async fn test_create_account_duplicate_and_invalid_id() {
    let app = TestApp::spawn().await;
    app.post("/session/role", &json!({ "role": "Admin" })).await;

    let resp = app
        .post(
            "/session/account",
            &json!({ "name": "X", "email": "x@example.com", "id": CUSTOMER_ID }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(
        json_body(resp).await["message"],
        "User ID already exists. Please choose a different ID."
    );

    let resp = app
        .post(
            "/session/account",
            &json!({ "name": "X", "email": "x@example.com", "id": "abc" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["kind"], "invalid_id");

    let resp = app
        .post("/session/account", &json!({ "name": "X", "id": "8" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["kind"], "missing_field");
}

#[tokio::test]
async fn test_navigation_respects_policy() {
    let app = TestApp::spawn().await;
    app.login_customer().await;

    let body = json_body(
        app.post("/session/navigate", &json!({ "target": "manage_orders" }))
            .await,
    )
    .await;
    assert_eq!(body["flags"]["viewing_orders"], true);
    assert_eq!(body["flags"]["search"], false);

    let resp = app
        .post("/session/navigate", &json!({ "target": "add_books" }))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["kind"], "view_not_allowed");

    // A refused navigation leaves the view unchanged.
    let body = json_body(app.get("/session").await).await;
    assert_eq!(body["flags"]["viewing_orders"], true);

    let body = json_body(
        app.post("/session/navigate", &json!({ "target": "home" }))
            .await,
    )
    .await;
    assert_eq!(body["flags"]["search"], true);
}

#[tokio::test]
async fn test_admin_book_modes_are_exclusive() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    let body = json_body(
        app.post("/session/navigate", &json!({ "target": "add_books" }))
            .await,
    )
    .await;
    assert_eq!(body["flags"]["add_mode"], true);
    assert_eq!(body["flags"]["delete_mode"], false);

    let body = json_body(
        app.post("/session/navigate", &json!({ "target": "delete_books" }))
            .await,
    )
    .await;
    assert_eq!(body["flags"]["add_mode"], false);
    assert_eq!(body["flags"]["delete_mode"], true);
    assert_eq!(body["flags"]["manage_books"], true);
}

#[tokio::test]
async fn test_navigate_requires_login() {
    let app = TestApp::spawn().await;

    let resp = app
        .post("/session/navigate", &json!({ "target": "reviews" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["kind"], "not_authenticated");
}

#[tokio::test]
async fn test_profile_edit_returns_home() {
    let app = TestApp::spawn().await;
    app.login_customer().await;
    app.post("/session/navigate", &json!({ "target": "edit_profile" }))
        .await;

    let body = json_body(app.get("/profile").await).await;
    assert_eq!(body["data"]["Username"], "Kim");
    assert_eq!(body["session"]["flags"]["edit_mode"], true);

    let body = json_body(
        app.put(
            "/profile",
            &json!({ "name": "Kimberly", "email": "kimberly@example.com" }),
        )
        .await,
    )
    .await;
    assert_eq!(body["message"], "Profile updated successfully!");
    assert_eq!(body["data"]["Email"], "kimberly@example.com");
    assert_eq!(body["session"]["user"]["display_name"], "Kimberly");
    assert_eq!(body["session"]["flags"]["edit_mode"], false);
    assert_eq!(body["session"]["flags"]["search"], true);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    let body = json_body(app.post("/session/logout", &json!({})).await).await;
    assert_eq!(body["flags"]["authenticated"], false);

    assert_eq!(app.get("/orders").await.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(app.get("/session").await).await;
    assert!(body["flags"]["user_type"].is_null());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let admin = TestApp::spawn().await;
    admin.login_admin().await;
    let customer = admin.new_session();
    customer.login_customer().await;

    let admin_view = json_body(admin.get("/session").await).await;
    let customer_view = json_body(customer.get("/session").await).await;
    assert_eq!(admin_view["user"]["display_name"], "A");
    assert_eq!(customer_view["user"]["display_name"], "Kim");
}
