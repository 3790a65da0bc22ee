use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn status_is_derived_from_the_clock() {
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
            &format!("/api/v1/live-meetings/course/{}", course.id),
            Some(&token),
            Some(json!({
                "title": "Kickoff",
                "hostName": "Priya",
                "meetingLink": "https://meet.example.com/kickoff",
                "scheduledDate": "2030-01-01T10:00:00Z"
            })),
        ))
        .await
        .expect("create future meeting");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["status"], "upcoming");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/live-meetings/course/{}", course.id),
            Some(&token),
            Some(json!({
                "title": "Retro",
                "instructor": "Priya",
                "meetingLink": "https://meet.example.com/retro",
                "date": "2020-01-01",
                "time": "10:00"
            })),
        ))
        .await
        .expect("create past meeting");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn missing_schedule_is_a_bad_request() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_admin(ctx.state.db(), "admin@example.com", "Admin", "admin-pass")
            .await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/live-meetings/course/{}", course.id),
            Some(&token),
            Some(json!({
                "title": "No schedule",
                "hostName": "Priya",
                "meetingLink": "https://meet.example.com/none"
            })),
        ))
        .await
        .expect("create meeting");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_with_legacy_date_time_pair_reschedules() {
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
            &format!("/api/v1/live-meetings/course/{}", course.id),
            Some(&token),
            Some(json!({
                "title": "Kickoff",
                "hostName": "Priya",
                "meetingLink": "https://meet.example.com/kickoff",
                "scheduledDate": "2030-01-01T10:00:00Z"
            })),
        ))
        .await
        .expect("create meeting");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    let meeting_id = body["id"].as_str().expect("meeting id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/live-meetings/{meeting_id}"),
            Some(&token),
            Some(json!({ "date": "2026-12-25", "time": "08:30" })),
        ))
        .await
        .expect("update meeting");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["scheduled_at"], "2026-12-25T08:30:00Z");
}

#[tokio::test]
async fn students_only_see_sessions_for_enrolled_courses() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_admin(ctx.state.db(), "admin@example.com", "Admin", "admin-pass")
            .await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let enrolled_course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;
    let other_course = test_support::insert_course(ctx.state.db(), "Go 101", 0).await;

    for (course_id, title) in
        [(&enrolled_course.id, "Rust session"), (&other_course.id, "Go session")]
    {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/live-meetings/course/{course_id}"),
                Some(&token),
                Some(json!({
                    "title": title,
                    "hostName": "Priya",
                    "meetingLink": "https://meet.example.com/session",
                    "scheduledDate": "2030-01-01T10:00:00Z"
                })),
            ))
            .await
            .expect("create meeting");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let student =
        test_support::insert_user(ctx.state.db(), "student@example.com", "Student", "student-pass")
            .await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &enrolled_course.id).await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/live-meetings",
            Some(&student_token),
            None,
        ))
        .await
        .expect("list meetings");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let meetings = body.as_array().expect("meetings array");
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0]["title"], "Rust session");

    // The admin sees both.
    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/live-meetings", Some(&token), None))
        .await
        .expect("list meetings as admin");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("meetings array").len(), 2);
}

#[tokio::test]
async fn listing_requires_authentication() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/live-meetings", None, None))
        .await
        .expect("list meetings");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
