use axum::http::{Method, StatusCode};
use internship_api::db::repo::users_repository;
use serde_json::json;

mod common {
    pub use crate::helpers::*;
}

const ADMIN_ROLE_ID: i64 = 1;
const STUDENT_ROLE_ID: i64 = 3;

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_create_user() {
    let (app, app_state) = common::setup_db_app().await;
    let (_, admin_token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let test_email = common::get_test_email();

    let user_data = json!({
        "full_name": "Suda Rakdee",
        "email": test_email.to_uppercase(),
        "password": common::TEST_PASSWORD,
        "role_id": 2
    });
    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/users",
        Some(user_data.to_string()),
        Some(&admin_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = common::response_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(location, format!("/api/v1/users/{id}"));
    assert_eq!(body["data"]["email"], test_email);
    assert_eq!(body["data"]["role"], "instructor");
    assert!(body["data"].get("password_hash").is_none());

    // Verify the stored row
    let db_user = users_repository::get_user_by_id(&app_state.pg_pool, id)
        .await
        .expect("Failed to retrieve user from database");
    assert_eq!(db_user.email, test_email);
    assert!(db_user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_create_user_with_duplicate_email_conflicts() {
    let (app, _) = common::setup_db_app().await;
    let email = common::get_test_email();
    let (_, token) = common::register_user_with_email(app.clone(), &email, ADMIN_ROLE_ID).await;

    let user_data = json!({
        "full_name": "Duplicate",
        "email": email,
        "password": common::TEST_PASSWORD,
        "role_id": STUDENT_ROLE_ID
    });
    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/users",
        Some(user_data.to_string()),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(common::response_json(response).await["code"], "EMAIL_EXISTS");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_get_unknown_user_returns_not_found() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;

    let response =
        common::make_request(app, Method::GET, "/api/v1/users/999999999", None, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::response_json(response).await["code"], "USER_NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_non_numeric_user_id_is_bad_request() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;

    let response =
        common::make_request(app, Method::GET, "/api/v1/users/abc", None, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::response_json(response).await["code"], "INVALID_ID");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_bulk_delete_requires_admin() {
    let (app, _) = common::setup_db_app().await;
    let (victim_id, _) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;
    let (_, student_token) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;

    let response = common::make_request(
        app,
        Method::DELETE,
        "/api/v1/users/bulk",
        Some(json!({ "user_ids": [victim_id] }).to_string()),
        Some(&student_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_bulk_delete_is_all_or_nothing() {
    let (app, app_state) = common::setup_db_app().await;
    let (admin_id, admin_token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let (first, _) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;
    let (second, _) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;

    let own = common::make_request(
        app.clone(),
        Method::DELETE,
        "/api/v1/users/bulk",
        Some(json!({ "user_ids": [first, admin_id] }).to_string()),
        Some(&admin_token),
    )
    .await;
    assert_eq!(own.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::response_json(own).await["code"], "CANNOT_DELETE_SELF");

    let missing = common::make_request(
        app.clone(),
        Method::DELETE,
        "/api/v1/users/bulk",
        Some(json!({ "user_ids": [first, 999_999_999] }).to_string()),
        Some(&admin_token),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(
        users_repository::get_user_by_id(&app_state.pg_pool, first)
            .await
            .is_ok()
    );

    let deleted = common::make_request(
        app,
        Method::DELETE,
        "/api/v1/users/bulk",
        Some(json!({ "user_ids": [first, second, first] }).to_string()),
        Some(&admin_token),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(common::response_json(deleted).await["data"]["deleted"], 2);
}
