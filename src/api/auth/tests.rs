use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn register_then_login_round_trip() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "asha@example.com",
                "password": "strong-password",
                "fullName": "Asha Rao"
            })),
        ))
        .await
        .expect("register");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert!(created["access_token"].as_str().is_some());
    assert_eq!(created["user"]["email"], "asha@example.com");
    assert_eq!(created["user"]["role"], "student");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "strong-password" })),
        ))
        .await
        .expect("login");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    test_support::insert_user(ctx.state.db(), "dup@example.com", "First", "password-1").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "dup@example.com",
                "password": "password-2",
                "fullName": "Second"
            })),
        ))
        .await
        .expect("register");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let ctx = test_support::setup_test_context().await;

    test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "right-password").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "wrong-password" })),
        ))
        .await
        .expect("login");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_without_token_returns_401() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", None, None))
        .await
        .expect("me");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(axum::http::header::WWW_AUTHENTICATE));
}
