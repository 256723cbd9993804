use axum::http::{Method, StatusCode};
use serde_json::json;

mod common {
    pub use crate::helpers::*;
}

const ADMIN_ROLE_ID: i64 = 1;
const STUDENT_ROLE_ID: i64 = 3;

async fn login_status(app: axum::Router, email: &str, password: &str) -> StatusCode {
    common::make_request(
        app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "email": email, "password": password }).to_string()),
        None,
    )
    .await
    .status()
}

fn registration(email: &str, role_id: i64) -> String {
    json!({
        "full_name": "Test User",
        "email": email,
        "password": common::TEST_PASSWORD,
        "confirm_password": common::TEST_PASSWORD,
        "role_id": role_id
    })
    .to_string()
}

#[tokio::test]
async fn test_protected_route_requires_authorization_header() {
    let app = common::setup_test_app();

    let response = common::make_request(app, Method::GET, "/api/v1/me", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Missing Authorization header");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = common::setup_test_app();

    let response =
        common::make_request(app, Method::GET, "/api/v1/students", None, Some("not-a-jwt")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let app = common::setup_test_app();
    let expired = common::test_jwt(-3600)
        .generate_access_token(&common::subject(1, "admin"))
        .unwrap();

    let response = common::make_request(
        app,
        Method::GET,
        "/api/v1/courses",
        None,
        Some(&expired.token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_refresh_token_cannot_access_protected_routes() {
    let app = common::setup_test_app();
    let refresh = common::test_jwt(900)
        .generate_refresh_token(&common::subject(1, "admin"))
        .unwrap();

    let response =
        common::make_request(app, Method::GET, "/api/v1/me", None, Some(&refresh.token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let app = common::setup_test_app();
    let foreign = internship_api::service::jwt_service::JwtService::new(
        b"some-other-secret",
        common::TEST_ISSUER,
        900,
        3600,
        600,
    )
    .generate_access_token(&common::subject(1, "admin"))
    .unwrap();

    let response =
        common::make_request(app, Method::GET, "/api/v1/users", None, Some(&foreign.token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_with_malformed_json_returns_bad_request() {
    let app = common::setup_test_app();

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/register",
        Some("{\"email\": ".to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::response_json(response).await;
    assert_eq!(body["code"], "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn test_register_with_weak_password_returns_validation_error() {
    let app = common::setup_test_app();
    let user_data = json!({
        "full_name": "Test User",
        "email": common::get_test_email(),
        "password": "password",
        "confirm_password": "password",
        "role_id": 3
    });

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/register",
        Some(user_data.to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let errors = body["errors"].as_array().unwrap();
    let password_error = errors
        .iter()
        .find(|e| e["field"] == "password")
        .expect("password error present");
    assert!(
        password_error["message"]
            .as_str()
            .unwrap()
            .contains("uppercase letter")
    );
    // Submitted passwords are never echoed back.
    assert_eq!(password_error["value"], "");
}

#[tokio::test]
async fn test_register_with_mismatched_confirmation_returns_validation_error() {
    let app = common::setup_test_app();
    let user_data = json!({
        "full_name": "Test User",
        "email": common::get_test_email(),
        "password": common::TEST_PASSWORD,
        "confirm_password": "Password124!",
        "role_id": 3
    });

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/register",
        Some(user_data.to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::response_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert!(
        errors
            .iter()
            .any(|e| e["field"] == "confirm_password" && e["message"] == "Passwords do not match")
    );
}

#[tokio::test]
async fn test_login_with_invalid_email_returns_validation_error() {
    let app = common::setup_test_app();
    let credentials = json!({ "email": "not-an-email", "password": "whatever" });

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/login",
        Some(credentials.to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::response_json(response).await;
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_register_login_and_logout_flow() {
    let (app, _state) = common::setup_db_app().await;
    let email = common::get_test_email();
    let (user_id, _) = common::register_user_with_email(app.clone(), &email, 3).await;

    let login = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/login",
        Some(json!({ "email": email.to_uppercase(), "password": common::TEST_PASSWORD }).to_string()),
        None,
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let login_body = common::response_json(login).await;
    assert_eq!(login_body["data"]["token_type"], "Bearer");
    let access = login_body["data"]["access_token"].as_str().unwrap().to_string();

    let me = common::make_request(app.clone(), Method::GET, "/api/v1/me", None, Some(&access)).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(common::response_json(me).await["data"]["id"], user_id);

    let logout =
        common::make_request(app.clone(), Method::POST, "/api/v1/logout", None, Some(&access)).await;
    assert_eq!(logout.status(), StatusCode::OK);

    let after = common::make_request(app, Method::GET, "/api/v1/me", None, Some(&access)).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_login_with_unknown_email_is_unauthorized() {
    let (app, _state) = common::setup_db_app().await;

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "email": common::get_test_email(), "password": "Wrong123!" }).to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_refresh_token_works_once() {
    let (app, _state) = common::setup_db_app().await;
    let register = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/register",
        Some(
            json!({
                "full_name": "Refresh User",
                "email": common::get_test_email(),
                "password": common::TEST_PASSWORD,
                "confirm_password": common::TEST_PASSWORD,
                "role_id": 3
            })
            .to_string(),
        ),
        None,
    )
    .await;
    assert_eq!(register.status(), StatusCode::CREATED);
    let refresh = common::response_json(register).await["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();
    let body = json!({ "refresh_token": refresh }).to_string();

    let first = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/refresh-token",
        Some(body.clone()),
        None,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second =
        common::make_request(app, Method::POST, "/api/v1/refresh-token", Some(body), None).await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (app, _state) = common::setup_db_app().await;
    let email = common::get_test_email();
    common::register_user_with_email(app.clone(), &email, STUDENT_ROLE_ID).await;

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "email": email, "password": "Wrong123!" }).to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_register_with_used_email_conflicts() {
    let (app, _state) = common::setup_db_app().await;
    let email = common::get_test_email();
    common::register_user_with_email(app.clone(), &email, STUDENT_ROLE_ID).await;

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/register",
        Some(registration(&email.to_uppercase(), STUDENT_ROLE_ID)),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(common::response_json(response).await["code"], "EMAIL_EXISTS");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_register_with_unknown_role_is_bad_request() {
    let (app, _state) = common::setup_db_app().await;

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/register",
        Some(registration(&common::get_test_email(), 999)),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::response_json(response).await["code"], "INVALID_ROLE");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_reset_token_works_once() {
    let (app, _state) = common::setup_db_app().await;
    let email = common::get_test_email();
    let (user_id, _) = common::register_user_with_email(app.clone(), &email, STUDENT_ROLE_ID).await;
    let reset = common::test_jwt(900)
        .generate_password_reset_token(user_id, &email)
        .unwrap();
    let body = |password: &str| {
        json!({
            "token": reset.token,
            "new_password": password,
            "confirm_password": password
        })
        .to_string()
    };

    let first = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/reset-password",
        Some(body("NewPassword123!")),
        None,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(
        login_status(app.clone(), &email, "NewPassword123!").await,
        StatusCode::OK
    );

    let second = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/reset-password",
        Some(body("OtherPassword123!")),
        None,
    )
    .await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::response_json(second).await["code"], "TOKEN_INVALID");
    assert_eq!(
        login_status(app, &email, "OtherPassword123!").await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_change_password_checks_current_password() {
    let (app, _state) = common::setup_db_app().await;
    let email = common::get_test_email();
    let (_, token) = common::register_user_with_email(app.clone(), &email, STUDENT_ROLE_ID).await;
    let change = |current: &str| {
        json!({
            "current_password": current,
            "new_password": "NewPassword123!",
            "confirm_password": "NewPassword123!"
        })
        .to_string()
    };

    let wrong = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/change-password",
        Some(change("Wrong123!")),
        Some(&token),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::response_json(wrong).await["code"], "INVALID_PASSWORD");

    let changed = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/change-password",
        Some(change(common::TEST_PASSWORD)),
        Some(&token),
    )
    .await;
    assert_eq!(changed.status(), StatusCode::OK);

    assert_eq!(
        login_status(app.clone(), &email, common::TEST_PASSWORD).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login_status(app, &email, "NewPassword123!").await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_student_login_with_malformed_id_returns_validation_error() {
    let app = common::setup_test_app();

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/student-login",
        Some(json!({ "student_id": "64-01", "password": common::TEST_PASSWORD }).to_string()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::response_json(response).await;
    assert_eq!(body["errors"][0]["field"], "student_id");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_student_login_by_student_id() {
    let (app, _state) = common::setup_db_app().await;
    let (_, admin_token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let (user_id, _) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;
    let student_id = common::get_test_student_id();
    common::create_resource(
        app.clone(),
        "/api/v1/students",
        json!({
            "user_id": user_id,
            "student_id": student_id,
            "name": "Malee",
            "surname": "Srisuk"
        }),
        &admin_token,
    )
    .await;
    let student_login = |id: &str, password: &str| {
        common::make_request(
            app.clone(),
            Method::POST,
            "/api/v1/student-login",
            Some(json!({ "student_id": id, "password": password }).to_string()),
            None,
        )
    };

    // Dashes are ignored when matching the id.
    let dashed = format!("{}-{}-{}", &student_id[..2], &student_id[2..6], &student_id[6..]);
    let ok = student_login(&dashed, common::TEST_PASSWORD).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let body = common::response_json(ok).await;
    assert_eq!(body["data"]["user"]["id"], user_id);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let wrong = student_login(&student_id, "Wrong123!").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::response_json(wrong).await["code"], "INVALID_CREDENTIALS");

    let unknown = student_login("00000000000", common::TEST_PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::response_json(unknown).await["code"], "INVALID_CREDENTIALS");
}
