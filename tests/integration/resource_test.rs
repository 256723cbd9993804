use axum::http::{Method, StatusCode};
use serde_json::json;

mod common {
    pub use crate::helpers::*;
}

const ADMIN_ROLE_ID: i64 = 1;
const STUDENT_ROLE_ID: i64 = 3;

async fn create_section(app: axum::Router, token: &str, max_students: i32) -> i64 {
    let suffix = nanoid::nanoid!(6);
    let curriculum_id = common::create_resource(
        app.clone(),
        "/api/v1/curriculums",
        json!({ "code": format!("CUR-{suffix}"), "name": "Computer Engineering" }),
        token,
    )
    .await;
    let course_id = common::create_resource(
        app.clone(),
        "/api/v1/courses",
        json!({
            "curriculum_id": curriculum_id,
            "code": format!("CPE-{suffix}"),
            "name": "Co-operative Education",
            "credits": 6
        }),
        token,
    )
    .await;
    common::create_resource(
        app,
        "/api/v1/course-sections",
        json!({
            "course_id": course_id,
            "section": "1",
            "semester": 1,
            "year": 2025,
            "max_students": max_students
        }),
        token,
    )
    .await
}

async fn create_student(app: axum::Router, token: &str) -> i64 {
    let (user_id, _) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;
    common::create_resource(
        app,
        "/api/v1/students",
        json!({
            "user_id": user_id,
            "student_id": common::get_test_student_id(),
            "name": "Somchai",
            "surname": "Jaidee",
            "gpax": 3.25,
            "phone_number": "081-234-5678"
        }),
        token,
    )
    .await
}

#[tokio::test]
async fn test_resource_routes_require_authentication() {
    for uri in [
        "/api/v1/students",
        "/api/v1/instructors",
        "/api/v1/staff",
        "/api/v1/courses",
        "/api/v1/course-sections",
        "/api/v1/companies",
        "/api/v1/visitor-trainings",
        "/api/v1/visitor-evaluations/students",
        "/api/v1/files",
    ] {
        let app = common::setup_test_app();
        let response = common::make_request(app, Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_course_with_unknown_curriculum_is_rejected() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/courses",
        Some(
            json!({
                "curriculum_id": 999_999_999,
                "code": "CPE-404",
                "name": "Orphan",
                "credits": 3
            })
            .to_string(),
        ),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        common::response_json(response).await["code"],
        "CURRICULUM_NOT_FOUND"
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_student_phone_and_id_are_normalized() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let id = create_student(app.clone(), &token).await;

    let response = common::make_request(
        app,
        Method::GET,
        &format!("/api/v1/students/{id}"),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["data"]["phone_number"], "0812345678");
    assert_eq!(body["data"]["student_id"].as_str().unwrap().len(), 11);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_enrollment_respects_section_capacity() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let section_id = create_section(app.clone(), &token, 1).await;
    let first = create_student(app.clone(), &token).await;
    let second = create_student(app.clone(), &token).await;

    let enroll = |student_id: i64| {
        json!({ "student_id": student_id, "course_section_id": section_id }).to_string()
    };

    let response = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/students/enroll",
        Some(enroll(first)),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::response_json(response).await["data"]["status"], "enrolled");

    let again = common::make_request(
        app.clone(),
        Method::POST,
        "/api/v1/students/enroll",
        Some(enroll(first)),
        Some(&token),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let full = common::make_request(
        app,
        Method::POST,
        "/api/v1/students/enroll",
        Some(enroll(second)),
        Some(&token),
    )
    .await;
    assert_eq!(full.status(), StatusCode::CONFLICT);
    assert_eq!(common::response_json(full).await["code"], "SECTION_FULL");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_course_listing_is_paginated() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    create_section(app.clone(), &token, 30).await;

    let response = common::make_request(
        app,
        Method::GET,
        "/api/v1/courses?page=1&limit=1",
        None,
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["limit"], 1);
    assert!(body["pagination"]["total"].as_i64().unwrap() >= 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_missing_file_download_is_not_found() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), STUDENT_ROLE_ID).await;

    let response = common::make_request(
        app,
        Method::GET,
        "/api/v1/files/report.pdf",
        None,
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::response_json(response).await["code"], "FILE_NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_deleted_company_is_not_found() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let id = common::create_resource(
        app.clone(),
        "/api/v1/companies",
        json!({ "name": "Siam Robotics", "phone_number": "081-111-2222" }),
        &token,
    )
    .await;
    let uri = format!("/api/v1/companies/{id}");

    let deleted = common::make_request(app.clone(), Method::DELETE, &uri, None, Some(&token)).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let fetched = common::make_request(app.clone(), Method::GET, &uri, None, Some(&token)).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::response_json(fetched).await["code"], "COMPANY_NOT_FOUND");

    let again = common::make_request(app, Method::DELETE, &uri, None, Some(&token)).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_duplicate_course_code_conflicts() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let suffix = nanoid::nanoid!(6);
    let curriculum_id = common::create_resource(
        app.clone(),
        "/api/v1/curriculums",
        json!({ "code": format!("CUR-{suffix}"), "name": "Electrical Engineering" }),
        &token,
    )
    .await;
    let course = json!({
        "curriculum_id": curriculum_id,
        "code": format!("EE-{suffix}"),
        "name": "Internship",
        "credits": 3
    });
    common::create_resource(app.clone(), "/api/v1/courses", course.clone(), &token).await;

    let response = common::make_request(
        app,
        Method::POST,
        "/api/v1/courses",
        Some(course.to_string()),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = common::response_json(response).await;
    assert_eq!(body["code"], "COURSE_CODE_EXISTS");
    assert_eq!(body["error"], "Course code already exists");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_concurrent_enrollments_do_not_overfill_section() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let section_id = create_section(app.clone(), &token, 2).await;
    let mut students = Vec::new();
    for _ in 0..6 {
        students.push(create_student(app.clone(), &token).await);
    }

    let mut requests = tokio::task::JoinSet::new();
    for student_id in students {
        let app = app.clone();
        let token = token.clone();
        requests.spawn(async move {
            let body = json!({ "student_id": student_id, "course_section_id": section_id });
            common::make_request(
                app,
                Method::POST,
                "/api/v1/students/enroll",
                Some(body.to_string()),
                Some(&token),
            )
            .await
            .status()
        });
    }
    let mut statuses = Vec::new();
    while let Some(status) = requests.join_next().await {
        statuses.push(status.unwrap());
    }

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let full = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(created, 2);
    assert_eq!(full, 4);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_huge_page_number_returns_empty_page() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;

    for uri in [
        "/api/v1/courses?page=9223372036854775807&limit=100",
        "/api/v1/files?page=9223372036854775807",
    ] {
        let response =
            common::make_request(app.clone(), Method::GET, uri, None, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        let body = common::response_json(response).await;
        assert!(body["data"].as_array().unwrap().is_empty(), "GET {uri}");
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_blank_course_code_on_update_is_rejected() {
    let (app, _) = common::setup_db_app().await;
    let (_, token) = common::register_user(app.clone(), ADMIN_ROLE_ID).await;
    let suffix = nanoid::nanoid!(6);
    let curriculum_id = common::create_resource(
        app.clone(),
        "/api/v1/curriculums",
        json!({ "code": format!("CUR-{suffix}"), "name": "Industrial Engineering" }),
        &token,
    )
    .await;
    let course_id = common::create_resource(
        app.clone(),
        "/api/v1/courses",
        json!({
            "curriculum_id": curriculum_id,
            "code": format!("IE-{suffix}"),
            "name": "Field Training",
            "credits": 3
        }),
        &token,
    )
    .await;

    let response = common::make_request(
        app,
        Method::PUT,
        &format!("/api/v1/courses/{course_id}"),
        Some(json!({ "code": "   ", "name": "" }).to_string()),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::response_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "code"));
    assert!(errors.iter().any(|e| e["field"] == "name"));
}
