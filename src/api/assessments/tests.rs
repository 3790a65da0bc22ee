use axum::http::{header, Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn legacy_field_names_create_canonical_assessment() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_admin(ctx.state.db(), "admin@example.com", "Admin", "admin-pass")
            .await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 15_000).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/assessments",
            Some(&token),
            Some(json!({
                "courseId": course.id,
                "title": "Module quiz",
                "type": "quiz",
                "timeLimit": 30,
                "passingMarks": 40
            })),
        ))
        .await
        .expect("create assessment");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["duration_minutes"], 30);
    assert_eq!(body["passing_score"], 40);
    // Legacy read aliases mirror the canonical values.
    assert_eq!(body["time_limit"], 30);
    assert_eq!(body["passing_marks"], 40);
    assert_eq!(body["course_title"], "Rust 101");
}

#[tokio::test]
async fn deleting_the_course_invalidates_its_assessments() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_admin(ctx.state.db(), "admin@example.com", "Admin", "admin-pass")
            .await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/assessments",
            Some(&token),
            Some(json!({
                "courseId": course.id,
                "title": "Final exam",
                "type": "exam",
                "duration": 120,
                "passingScore": 50
            })),
        ))
        .await
        .expect("create assessment");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    let assessment_id = created["id"].as_str().expect("assessment id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete course");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assessments/{assessment_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("get orphaned assessment");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/assessments", Some(&token), None))
        .await
        .expect("list assessments");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("assessments").len(), 0);
}

#[tokio::test]
async fn csv_export_has_one_quoted_row_per_assessment() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_admin(ctx.state.db(), "admin@example.com", "Admin", "admin-pass")
            .await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;

    for title in ["Quiz one", "Quiz two"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/assessments",
                Some(&token),
                Some(json!({
                    "courseId": course.id,
                    "title": title,
                    "type": "quiz",
                    "duration_minutes": 45,
                    "passing_score": 40
                })),
            ))
            .await
            .expect("create assessment");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/assessments/export.csv",
            Some(&token),
            None,
        ))
        .await
        .expect("export csv");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let csv = String::from_utf8(body.to_vec()).expect("utf8");
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("\"Title\",\"Course\""));
    assert!(csv.contains("\"45 mins\""));
    assert!(csv.contains("\"40%\""));
}
