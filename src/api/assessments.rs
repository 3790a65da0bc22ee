use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Assessment;
use crate::repositories;
use crate::schemas::assessment::{AssessmentCreate, AssessmentResponse, AssessmentUpdate};
use crate::services::assessment_export;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assessments).post(create_assessment))
        .route("/export.csv", get(export_assessments))
        .route(
            "/:assessment_id",
            get(get_assessment).put(update_assessment).delete(delete_assessment),
        )
        .route("/course/:course_id", get(list_for_course))
}

async fn list_assessments(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    let assessments = repositories::assessments::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;
    let titles = course_titles(&state).await?;
    Ok(Json(with_titles(assessments, &titles)))
}

async fn list_for_course(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let assessments = repositories::assessments::list_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;

    let responses = assessments
        .into_iter()
        .map(|assessment| AssessmentResponse::from_db(assessment, course.title.clone()))
        .collect();
    Ok(Json(responses))
}

async fn get_assessment(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(assessment_id): Path<String>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let assessment = fetch_assessment(&state, &assessment_id).await?;
    let course = repositories::courses::find_by_id(state.db(), &assessment.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;
    Ok(Json(AssessmentResponse::from_db(assessment, course.title)))
}

async fn create_assessment(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<AssessmentCreate>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::BadRequest("Unknown course for assessment".to_string()))?;

    let now = primitive_now_utc();
    let assessment = repositories::assessments::create(
        state.db(),
        repositories::assessments::CreateAssessment {
            id: &Uuid::new_v4().to_string(),
            course_id: &payload.course_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            kind: payload.kind,
            questions: payload.questions.clone(),
            duration_minutes: payload.duration_minutes,
            passing_score: payload.passing_score,
            total_marks: payload.total_marks,
            is_active: payload.is_active,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assessment"))?;

    Ok((StatusCode::CREATED, Json(AssessmentResponse::from_db(assessment, course.title))))
}

async fn update_assessment(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(assessment_id): Path<String>,
    Json(payload): Json<AssessmentUpdate>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_assessment(&state, &assessment_id).await?;

    repositories::assessments::update(
        state.db(),
        &assessment_id,
        repositories::assessments::UpdateAssessment {
            title: payload.title,
            description: payload.description,
            kind: payload.kind,
            questions: payload.questions,
            duration_minutes: payload.duration_minutes,
            passing_score: payload.passing_score,
            total_marks: payload.total_marks,
            is_active: payload.is_active,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update assessment"))?;

    let assessment = fetch_assessment(&state, &assessment_id).await?;
    let course = repositories::courses::find_by_id(state.db(), &assessment.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;
    Ok(Json(AssessmentResponse::from_db(assessment, course.title)))
}

async fn delete_assessment(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(assessment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::assessments::delete(state.db(), &assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assessment"))?;
    if !deleted {
        return Err(ApiError::NotFound("Assessment not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// CSV snapshot of the registry as currently listed, one row per assessment.
async fn export_assessments(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let assessments = repositories::assessments::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;
    let titles = course_titles(&state).await?;

    let rows: Vec<(Assessment, String)> = assessments
        .into_iter()
        .map(|assessment| {
            let title = titles.get(&assessment.course_id).cloned().unwrap_or_default();
            (assessment, title)
        })
        .collect();

    let body = assessment_export::to_csv(&rows);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"assessments.csv\""),
        ],
        body,
    ))
}

async fn fetch_assessment(state: &AppState, assessment_id: &str) -> Result<Assessment, ApiError> {
    repositories::assessments::find_by_id(state.db(), assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assessment"))?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))
}

async fn course_titles(state: &AppState) -> Result<HashMap<String, String>, ApiError> {
    let courses = repositories::courses::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    Ok(courses.into_iter().map(|course| (course.id, course.title)).collect())
}

fn with_titles(
    assessments: Vec<Assessment>,
    titles: &HashMap<String, String>,
) -> Vec<AssessmentResponse> {
    assessments
        .into_iter()
        .map(|assessment| {
            let title = titles.get(&assessment.course_id).cloned().unwrap_or_default();
            AssessmentResponse::from_db(assessment, title)
        })
        .collect()
}

#[cfg(test)]
mod tests;
