use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{FormStatus, FormType, PaymentStatus};
use crate::repositories;
use crate::schemas::enrollment::{
    EnrollmentFormResponse, EnrollmentFormSubmit, EnrollmentResponse, FormStatusUpdate,
    PaymentConfirmRequest, PaymentConfirmResponse, PaymentOptionsResponse, PaymentResponse,
    ProgressUpdate,
};
use crate::services::enrollment::{self, EnrollmentError};
use crate::services::{payment_links, pricing};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/forms", post(submit_form).get(list_my_forms))
        .route("/forms/all", get(list_all_forms))
        .route("/forms/:form_id/status", put(update_form_status))
        .route("/payment-options/:course_id", get(payment_options))
        .route("/payments/confirm", post(confirm_payment))
        .route("/payments", get(list_my_payments))
        .route("/my", get(list_my_enrollments))
        .route("/:enrollment_id/progress", put(update_progress))
}

/// Submit a course or job application. Course applications answer with the
/// payment route to continue on; job applications are complete immediately.
async fn submit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<EnrollmentFormSubmit>,
) -> Result<(StatusCode, Json<EnrollmentFormResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if payload.form_type == FormType::Course {
        let exists = repositories::courses::exists(state.db(), &payload.related_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load course"))?;
        if !exists {
            return Err(ApiError::BadRequest("Unknown course for enrollment".to_string()));
        }
    }

    let (permanent, current) = enrollment::resolve_addresses(
        payload.permanent_address.clone().into_address(),
        payload.current_address.clone().map(|address| address.into_address()),
        payload.is_same_address,
    )
    .map_err(|err| match err {
        EnrollmentError::CurrentAddressRequired => ApiError::BadRequest(err.to_string()),
    })?;

    let form = repositories::enrollment_forms::create(
        state.db(),
        repositories::enrollment_forms::CreateEnrollmentForm {
            id: &Uuid::new_v4().to_string(),
            student_id: &user.id,
            form_type: payload.form_type,
            related_id: &payload.related_id,
            status: FormStatus::Pending,
            first_name: payload.first_name.trim(),
            last_name: payload.last_name.trim(),
            email: &payload.email,
            phone: &payload.phone,
            date_of_birth: payload.date_of_birth,
            gender: &payload.gender,
            aadhar_number: &payload.aadhar_number,
            certificate_id: payload.certificate_id.as_deref(),
            permanent_address: permanent,
            current_address: current,
            is_same_address: payload.is_same_address,
            father_name: payload.father_name.trim(),
            mother_name: payload.mother_name.trim(),
            guardian_phone: &payload.guardian_phone,
            guardian_email: payload.guardian_email.as_deref(),
            tenth_grade: payload.tenth_grade.clone().into_detail(),
            twelfth_grade: enrollment::normalize_optional_block(
                payload.twelfth_grade.clone().map(|block| block.into_detail()),
            ),
            degree: enrollment::normalize_optional_block(
                payload.degree.clone().map(|block| block.into_detail()),
            ),
            post_graduation: enrollment::normalize_optional_block(
                payload.post_graduation.clone().map(|block| block.into_detail()),
            ),
            document_urls: payload.document_urls.clone(),
            submitted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save enrollment form"))?;

    let outcome = enrollment::submission_outcome(form.form_type, &form.related_id);
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentFormResponse::from_db(form, outcome.next_step, outcome.payment_route)),
    ))
}

async fn list_my_forms(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EnrollmentFormResponse>>, ApiError> {
    let forms = repositories::enrollment_forms::list_for_student(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollment forms"))?;
    Ok(Json(to_form_responses(forms)))
}

async fn list_all_forms(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<Vec<EnrollmentFormResponse>>, ApiError> {
    let forms = repositories::enrollment_forms::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollment forms"))?;
    Ok(Json(to_form_responses(forms)))
}

async fn update_form_status(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(form_id): Path<String>,
    Json(payload): Json<FormStatusUpdate>,
) -> Result<StatusCode, ApiError> {
    let updated = repositories::enrollment_forms::update_status(state.db(), &form_id, payload.status)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update form status"))?;
    if !updated {
        return Err(ApiError::NotFound("Enrollment form not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Payment options for a course: the admin-configured checkout link when one
/// is set, plus the static bank and cash instructions.
async fn payment_options(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<PaymentOptionsResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let checkout_url = payment_links::get_payment_link(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load payment link"))?;

    Ok(Json(PaymentOptionsResponse {
        course_id: course.id,
        amount: course.price,
        amount_label: pricing::format_price(course.price),
        checkout_url,
        bank_instructions: state.settings().payments().bank_transfer_instructions.clone(),
        cash_instructions: state.settings().payments().cash_payment_instructions.clone(),
    }))
}

/// Confirm a payment and enroll the student. Every supported method records
/// an immediate success; repeating the call for the same course returns the
/// existing enrollment instead of a second one.
async fn confirm_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<PaymentConfirmRequest>,
) -> Result<(StatusCode, Json<PaymentConfirmResponse>), ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let payment = repositories::payments::create(
        state.db(),
        repositories::payments::CreatePayment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            student_id: &user.id,
            amount: course.price,
            status: PaymentStatus::Success,
            method: payload.method,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record payment"))?;

    metrics::counter!("payments_confirmed_total").increment(1);

    let (enrollment, newly_enrolled) =
        enrollment::create_enrollment(state.db(), &user.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to create enrollment"))?;

    let instructions = payment_links::fallback_instructions(payload.method, state.settings());

    let status = if newly_enrolled { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(PaymentConfirmResponse {
            payment_id: payment.id,
            status: payment.status,
            method: payment.method,
            amount: payment.amount,
            instructions,
            enrollment: EnrollmentResponse::from_db(enrollment),
            newly_enrolled,
        }),
    ))
}

async fn list_my_payments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = repositories::payments::list_for_student(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list payments"))?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from_db).collect()))
}

async fn list_my_enrollments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = repositories::enrollments::list_for_student(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from_db).collect()))
}

async fn update_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(enrollment_id): Path<String>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let enrollments = repositories::enrollments::list_for_student(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;
    if !enrollments.iter().any(|enrollment| enrollment.id == enrollment_id) {
        return Err(ApiError::NotFound("Enrollment not found".to_string()));
    }

    let completed = payload.progress >= 100;
    let updated = repositories::enrollments::update_progress(
        state.db(),
        &enrollment_id,
        payload.progress,
        completed,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update progress"))?;
    if !updated {
        return Err(ApiError::NotFound("Enrollment not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn to_form_responses(
    forms: Vec<crate::db::models::EnrollmentForm>,
) -> Vec<EnrollmentFormResponse> {
    forms
        .into_iter()
        .map(|form| {
            let outcome = enrollment::submission_outcome(form.form_type, &form.related_id);
            EnrollmentFormResponse::from_db(form, outcome.next_step, outcome.payment_route)
        })
        .collect()
}

#[cfg(test)]
mod tests;
