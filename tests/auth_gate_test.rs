// Auth gate and role checks, driven through the full router.
// The store is unreachable, so any request that gets past the checks would
// surface as a 503; a rejected request must leave the pool untouched.

mod common;

use axum::http::{header, StatusCode};
use common::*;
use serde_json::{json, Value};
use uuid::Uuid;

fn assert_pool_untouched(app: &TestApp) {
    let state = app.diesel_pool().state();
    assert_eq!(state.connections, 0, "request should not have reached the store");
}

#[tokio::test]
async fn test_missing_token_is_forbidden() {
    let app = setup_offline_app();

    let response = app.get("/me").send().await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_non_bearer_scheme_counts_as_missing() {
    let app = setup_offline_app();

    let response = app
        .get("/me")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = setup_offline_app();

    let response = app.get("/me").bearer("not.a.jwt").send().await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = setup_offline_app();
    let token = app.expired_token_for(subject(false, false));

    let response = app.post("/verify-token").bearer(&token).send().await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_token_from_another_key_is_unauthorized() {
    let app = setup_offline_app();
    let foreign = marketplace_backend::JwtService::new(marketplace_backend::JwtConfig::from_secret(
        b"some-other-secret-that-is-also-32-characters",
        3600,
        1,
    ));
    let token = foreign.issue(subject(true, false)).unwrap();

    let response = app.post("/verify-token").bearer(&token).send().await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_token_returns_claims() {
    let app = setup_offline_app();
    let who = subject(false, true);
    let token = app.token_for(who.clone());

    let response = app.post("/verify-token").bearer(&token).send().await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], who.id.to_string());
    assert_eq!(body["data"]["email"], who.email);
    assert_eq!(body["data"]["nom"], "X");
    assert_eq!(body["data"]["prenom"], "Y");
    assert_eq!(body["data"]["isAdmin"], false);
    assert_eq!(body["data"]["isEmployee"], true);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_non_admin_delete_is_forbidden_before_store_access() {
    let app = setup_offline_app();
    let token = app.token_for(subject(false, true));

    for uri in [
        format!("/delete/service/{}", Uuid::new_v4()),
        format!("/delete/user/{}", Uuid::new_v4()),
        format!("/delete/task/{}", Uuid::new_v4()),
        format!("/delete/devis/{}", Uuid::new_v4()),
    ] {
        let response = app.delete(&uri).bearer(&token).send().await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", uri);
        let body: Value = response.json().await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_non_admin_cannot_create_service_or_grant_roles() {
    let app = setup_offline_app();
    let token = app.token_for(subject(false, false));

    let response = app
        .post("/create/service")
        .bearer(&token)
        .json(&json!({"title": "Gardening", "price_cents": 1000, "category": "home"}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .put(&format!("/admin/users/{}/roles", Uuid::new_v4()))
        .bearer(&token)
        .json(&json!({"isAdmin": true}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_customer_cannot_update_quotes() {
    let app = setup_offline_app();
    let token = app.token_for(subject(false, false));

    let response = app
        .put(&format!("/update/devis/{}", Uuid::new_v4()))
        .bearer(&token)
        .json(&json!({"status": "accepted"}))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_user_cannot_update_someone_else() {
    let app = setup_offline_app();
    let token = app.token_for(subject(false, false));

    let response = app
        .put(&format!("/update/user/{}", Uuid::new_v4()))
        .bearer(&token)
        .json(&json!({"ville": "Lyon"}))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_expired_admin_token_on_delete_is_unauthorized() {
    let app = setup_offline_app();
    let token = app.expired_token_for(subject(true, false));

    let response = app
        .delete(&format!("/delete/service/{}", Uuid::new_v4()))
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_admin_delete_reaches_store_and_reports_unavailable() {
    let app = setup_offline_app();
    let token = app.token_for(subject(true, false));

    let response = app
        .delete(&format!("/delete/service/{}", Uuid::new_v4()))
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.header(header::RETRY_AFTER).is_some());
    let body: Value = response.json().await;
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_signup_missing_fields_rejected_before_store() {
    let app = setup_offline_app();

    let response = app
        .post("/signup")
        .json(&json!({"email": "a@b.com", "nom": "X"}))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["description"]
        .as_str()
        .unwrap()
        .contains("secret is required"));
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_login_malformed_body_rejected() {
    let app = setup_offline_app();

    let response = app
        .post("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_unknown_sort_column_rejected() {
    let app = setup_offline_app();

    let response = app.get("/services?sort=password_hash").send().await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_invalid_path_id_rejected() {
    let app = setup_offline_app();
    let token = app.token_for(subject(true, false));

    let response = app
        .delete("/delete/service/not-a-uuid")
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_pool_untouched(&app);
}

#[tokio::test]
async fn test_health_reports_degraded_store() {
    let app = setup_offline_app();

    let response = app.get("/health").send().await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["postgresql"]["status"], "unhealthy");
}
