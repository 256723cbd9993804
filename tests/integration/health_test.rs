use axum::http::{Method, StatusCode, header};

mod common {
    pub use crate::helpers::*;
}

#[tokio::test]
async fn test_health_is_public() {
    let app = common::setup_test_app();

    let response = common::make_request(app, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_api_info_reports_version() {
    let app = common::setup_test_app();

    let response = common::make_request(app, Method::GET, "/api/v1/test", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["message"], "API is working");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_not_found() {
    let app = common::setup_test_app();

    let response = common::make_request(app, Method::GET, "/no/such/route", None, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = common::response_json(response).await;
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn test_database_health_reports_unreachable_database() {
    if std::env::var("TEST_DATABASE_URL").is_ok() {
        return;
    }
    let app = common::setup_test_app();

    let response = common::make_request(app, Method::GET, "/health/db", None, None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = common::response_json(response).await;
    assert_eq!(body["status"], "error");
}
