use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::LiveMeeting;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::live_meeting::{LiveMeetingCreate, LiveMeetingResponse, LiveMeetingUpdate};
use crate::services::meeting_status;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meetings).post(create_meeting))
        .route("/course/:course_id", get(list_for_course).post(create_meeting_for_course))
        .route("/:meeting_id", get(get_meeting).put(update_meeting).delete(delete_meeting))
}

/// Admins see every session; students only see sessions for courses they are
/// enrolled in. Status is derived from the clock at response time.
async fn list_meetings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LiveMeetingResponse>>, ApiError> {
    let meetings = if user.role == UserRole::Admin {
        repositories::live_meetings::list_all(state.db())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list live meetings"))?
    } else {
        let course_ids = repositories::enrollments::enrolled_course_ids(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load enrollments"))?;
        if course_ids.is_empty() {
            Vec::new()
        } else {
            repositories::live_meetings::list_for_courses(state.db(), &course_ids)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list live meetings"))?
        }
    };

    Ok(Json(to_responses(meetings)))
}

async fn list_for_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<LiveMeetingResponse>>, ApiError> {
    if user.role != UserRole::Admin {
        let enrolled = repositories::enrollments::find_for_student_course(
            state.db(),
            &user.id,
            &course_id,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load enrollment"))?;
        if enrolled.is_none() {
            return Err(ApiError::Forbidden("Enrollment required for this course"));
        }
    }

    let meetings =
        repositories::live_meetings::list_for_courses(state.db(), &[course_id])
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list live meetings"))?;
    Ok(Json(to_responses(meetings)))
}

async fn get_meeting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(meeting_id): Path<String>,
) -> Result<Json<LiveMeetingResponse>, ApiError> {
    let meeting = fetch_meeting(&state, &meeting_id).await?;

    if user.role != UserRole::Admin {
        let enrolled = repositories::enrollments::find_for_student_course(
            state.db(),
            &user.id,
            &meeting.course_id,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load enrollment"))?;
        if enrolled.is_none() {
            return Err(ApiError::Forbidden("Enrollment required for this course"));
        }
    }

    let status = meeting_status::derive_for(&meeting, primitive_now_utc());
    Ok(Json(LiveMeetingResponse::from_db(meeting, status)))
}

async fn create_meeting(
    state: State<AppState>,
    admin: CurrentAdmin,
    Json(payload): Json<LiveMeetingCreate>,
) -> Result<(StatusCode, Json<LiveMeetingResponse>), ApiError> {
    let course_id = payload
        .course_id
        .clone()
        .ok_or_else(|| ApiError::BadRequest("course_id is required".to_string()))?;
    create_inner(state, admin, course_id, payload).await
}

async fn create_meeting_for_course(
    state: State<AppState>,
    admin: CurrentAdmin,
    Path(course_id): Path<String>,
    Json(payload): Json<LiveMeetingCreate>,
) -> Result<(StatusCode, Json<LiveMeetingResponse>), ApiError> {
    create_inner(state, admin, course_id, payload).await
}

async fn create_inner(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    course_id: String,
    payload: LiveMeetingCreate,
) -> Result<(StatusCode, Json<LiveMeetingResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let scheduled_at =
        payload.resolved_schedule().map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let exists = repositories::courses::exists(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?;
    if !exists {
        return Err(ApiError::BadRequest("Unknown course for live meeting".to_string()));
    }

    let now = primitive_now_utc();
    let meeting = repositories::live_meetings::create(
        state.db(),
        repositories::live_meetings::CreateLiveMeeting {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            host_name: payload.host_name.trim(),
            scheduled_at,
            duration_minutes: payload.duration_minutes,
            meeting_link: payload.meeting_link.trim(),
            max_participants: payload.max_participants,
            is_recording: payload.is_recording,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create live meeting"))?;

    let status = meeting_status::derive_for(&meeting, primitive_now_utc());
    Ok((StatusCode::CREATED, Json(LiveMeetingResponse::from_db(meeting, status))))
}

async fn update_meeting(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(meeting_id): Path<String>,
    Json(payload): Json<LiveMeetingUpdate>,
) -> Result<Json<LiveMeetingResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let scheduled_at =
        payload.resolved_schedule().map_err(|message| ApiError::BadRequest(message.to_string()))?;
    fetch_meeting(&state, &meeting_id).await?;

    repositories::live_meetings::update(
        state.db(),
        &meeting_id,
        repositories::live_meetings::UpdateLiveMeeting {
            title: payload.title,
            description: payload.description,
            host_name: payload.host_name,
            scheduled_at,
            duration_minutes: payload.duration_minutes,
            meeting_link: payload.meeting_link,
            max_participants: payload.max_participants,
            is_recording: payload.is_recording,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update live meeting"))?;

    let meeting = fetch_meeting(&state, &meeting_id).await?;
    let status = meeting_status::derive_for(&meeting, primitive_now_utc());
    Ok(Json(LiveMeetingResponse::from_db(meeting, status)))
}

async fn delete_meeting(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(meeting_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::live_meetings::delete(state.db(), &meeting_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete live meeting"))?;
    if !deleted {
        return Err(ApiError::NotFound("Live meeting not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn to_responses(meetings: Vec<LiveMeeting>) -> Vec<LiveMeetingResponse> {
    let now = primitive_now_utc();
    meetings
        .into_iter()
        .map(|meeting| {
            let status = meeting_status::derive_for(&meeting, now);
            LiveMeetingResponse::from_db(meeting, status)
        })
        .collect()
}

async fn fetch_meeting(state: &AppState, meeting_id: &str) -> Result<LiveMeeting, ApiError> {
    repositories::live_meetings::find_by_id(state.db(), meeting_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load live meeting"))?
        .ok_or_else(|| ApiError::NotFound("Live meeting not found".to_string()))
}

#[cfg(test)]
mod tests;
