use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::repositories;
use crate::test_support;

fn form_body(form_type: &str, related_id: &str) -> Value {
    json!({
        "formType": form_type,
        "relatedId": related_id,
        "firstName": "Asha",
        "lastName": "Rao",
        "email": "asha@example.com",
        "phone": "9876543210",
        "dateOfBirth": "2002-04-15",
        "gender": "female",
        "aadharNumber": "123412341234",
        "permanentAddress": {
            "line1": "12 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
            "country": "India"
        },
        "sameAsPermanent": true,
        "fatherName": "Mohan",
        "motherName": "Lakshmi",
        "guardianPhone": "9876500000",
        "tenthGrade": { "schoolName": "St. Mary's", "passingYear": "2017" }
    })
}

#[tokio::test]
async fn course_form_routes_to_payment_and_job_form_finishes() {
    let ctx = test_support::setup_test_context().await;

    let student =
        test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "student-pass").await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 15_000).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/forms",
            Some(&token),
            Some(form_body("course", &course.id)),
        ))
        .await
        .expect("submit course form");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["next_step"], "payment");
    assert_eq!(body["payment_route"], format!("/payment/{}", course.id));
    assert_eq!(body["status"], "pending");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/forms",
            Some(&token),
            Some(form_body("job", "job-42")),
        ))
        .await
        .expect("submit job form");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["next_step"], "done");
    assert!(body["payment_route"].is_null());
}

#[tokio::test]
async fn same_address_flag_copies_permanent_into_current() {
    let ctx = test_support::setup_test_context().await;

    let student =
        test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "student-pass").await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;

    // Send a divergent current address with the flag set; the copy must win.
    let mut body = form_body("course", &course.id);
    body["currentAddress"] = json!({
        "line1": "99 Brigade Road",
        "city": "Mysuru",
        "state": "Karnataka",
        "pincode": "570001",
        "country": "India"
    });

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/forms",
            Some(&token),
            Some(body),
        ))
        .await
        .expect("submit form");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    let form_id = created["id"].as_str().expect("form id");

    let stored = repositories::enrollment_forms::find_by_id(ctx.state.db(), form_id)
        .await
        .expect("load form")
        .expect("form exists");
    assert_eq!(stored.permanent_address.0, stored.current_address.0);
    assert_eq!(stored.current_address.0.city, "Bengaluru");
}

#[tokio::test]
async fn distinct_current_address_is_required_when_flag_is_off() {
    let ctx = test_support::setup_test_context().await;

    let student =
        test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "student-pass").await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;

    let mut body = form_body("course", &course.id);
    body["sameAsPermanent"] = json!(false);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/forms",
            Some(&token),
            Some(body),
        ))
        .await
        .expect("submit form");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repeated_payment_confirmation_enrolls_once() {
    let ctx = test_support::setup_test_context().await;

    let student =
        test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "student-pass").await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 15_000).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/payments/confirm",
            Some(&token),
            Some(json!({ "courseId": course.id, "method": "online" })),
        ))
        .await
        .expect("first confirmation");
    let status = response.status();
    let first = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {first}");
    assert_eq!(first["newly_enrolled"], true);
    assert_eq!(first["status"], "success");
    let first_enrollment_id = first["enrollment"]["id"].as_str().expect("enrollment id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/payments/confirm",
            Some(&token),
            Some(json!({ "courseId": course.id, "method": "bank" })),
        ))
        .await
        .expect("second confirmation");
    let status = response.status();
    let second = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {second}");
    assert_eq!(second["newly_enrolled"], false);
    assert_eq!(second["enrollment"]["id"], first_enrollment_id);
    assert!(second["instructions"].as_str().is_some());

    let enrollments = repositories::enrollments::list_for_student(ctx.state.db(), &student.id)
        .await
        .expect("list enrollments");
    assert_eq!(enrollments.len(), 1);
}

#[tokio::test]
async fn payment_options_prefer_the_admin_checkout_link() {
    let ctx = test_support::setup_test_context().await;

    let admin =
        test_support::insert_admin(ctx.state.db(), "admin@example.com", "Admin", "admin-pass")
            .await;
    let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let student =
        test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "student-pass").await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 15_000).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/enrollments/payment-options/{}", course.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("options without link");
    let body = test_support::read_json(response).await;
    assert!(body["checkout_url"].is_null());
    assert_eq!(body["amount_label"], "₹15,000");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/courses/{}/payment-link", course.id),
            Some(&admin_token),
            Some(json!({ "checkoutUrl": "https://pay.example.com/rust-101" })),
        ))
        .await
        .expect("set payment link");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/enrollments/payment-options/{}", course.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("options with link");
    let body = test_support::read_json(response).await;
    assert_eq!(body["checkout_url"], "https://pay.example.com/rust-101");
}

#[tokio::test]
async fn form_submission_requires_authentication() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments/forms",
            None,
            Some(form_body("course", "c1")),
        ))
        .await
        .expect("submit form");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn progress_updates_cap_at_completion() {
    let ctx = test_support::setup_test_context().await;

    let student =
        test_support::insert_user(ctx.state.db(), "asha@example.com", "Asha", "student-pass").await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Rust 101", 0).await;
    let enrollment =
        test_support::insert_enrollment(ctx.state.db(), &student.id, &course.id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/enrollments/{}/progress", enrollment.id),
            Some(&token),
            Some(json!({ "progress": 100 })),
        ))
        .await
        .expect("update progress");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stored = repositories::enrollments::find_for_student_course(
        ctx.state.db(),
        &student.id,
        &course.id,
    )
    .await
    .expect("load enrollment")
    .expect("enrollment exists");
    assert_eq!(stored.progress, 100);
    assert!(stored.completed);
}
