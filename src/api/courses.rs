use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Course, Material, Video};
use crate::repositories;
use crate::schemas::course::{
    CourseCreate, CourseResponse, CourseUpdate, MaterialCreate, PhaseCreate, PhaseUpdate,
    VideoCreate,
};
use crate::schemas::enrollment::PaymentLinkUpsert;
use crate::services::roadmap::{NewPhase, PhasePatch, RoadmapDraft, RoadmapError};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/all", get(list_all_courses))
        .route("/:course_id", get(get_course).put(update_course).delete(delete_course))
        .route("/:course_id/roadmap/phases", post(add_phase))
        .route(
            "/:course_id/roadmap/phases/:phase_number",
            put(edit_phase).delete(remove_phase),
        )
        .route("/:course_id/roadmap/phases/:phase_number/videos", post(add_video))
        .route(
            "/:course_id/roadmap/phases/:phase_number/videos/:video_id",
            delete(remove_video),
        )
        .route("/:course_id/roadmap/phases/:phase_number/materials", post(add_material))
        .route(
            "/:course_id/roadmap/phases/:phase_number/materials/:material_id",
            delete(remove_material),
        )
        .route("/:course_id/payment-link", put(set_payment_link).delete(clear_payment_link))
}

/// Public catalog: published courses only.
async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_published(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn list_all_courses(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn get_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    if !course.is_published && user.role != crate::db::types::UserRole::Admin {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }
    Ok(Json(CourseResponse::from_db(course)))
}

async fn create_course(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            duration: payload.duration.trim(),
            level: payload.level,
            price: payload.price,
            instructor: payload.instructor.as_deref(),
            category: payload.category.as_deref(),
            image_url: payload.image_url.as_deref(),
            is_published: payload.is_published,
            roadmap: Vec::new(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn update_course(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(course_id): Path<String>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_course(&state, &course_id).await?;

    repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            title: payload.title,
            description: payload.description,
            duration: payload.duration,
            level: payload.level,
            price: payload.price,
            instructor: payload.instructor,
            category: payload.category,
            image_url: payload.image_url,
            is_published: payload.is_published,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let course = fetch_course(&state, &course_id).await?;
    Ok(Json(CourseResponse::from_db(course)))
}

/// Deleting a course cascades to its assessments and meetings, but payments
/// and enrollments are kept as records; a course with either refuses deletion.
async fn delete_course(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(course_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::courses::delete(state.db(), &course_id)
        .await
        .map_err(delete_course_error)?;
    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn add_phase(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(course_id): Path<String>,
    Json(payload): Json<PhaseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = mutate_roadmap(&state, &course_id, |draft| {
        draft.add_phase(NewPhase {
            phase: payload.phase,
            title: payload.title.clone(),
            duration: payload.duration.clone(),
            topics: payload.topics.clone(),
            projects: payload.projects.clone(),
        })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn edit_phase(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path((course_id, phase_number)): Path<(String, i32)>,
    Json(payload): Json<PhaseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = mutate_roadmap(&state, &course_id, |draft| {
        draft.edit_phase(
            phase_number,
            PhasePatch {
                phase: payload.phase,
                title: payload.title.clone(),
                duration: payload.duration.clone(),
                topics: payload.topics.clone(),
                projects: payload.projects.clone(),
            },
        )
    })
    .await?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn remove_phase(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path((course_id, phase_number)): Path<(String, i32)>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course =
        mutate_roadmap(&state, &course_id, |draft| draft.remove_phase(phase_number)).await?;
    Ok(Json(CourseResponse::from_db(course)))
}

async fn add_video(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path((course_id, phase_number)): Path<(String, i32)>,
    Json(payload): Json<VideoCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let video = Video {
        id: Uuid::new_v4().to_string(),
        title: payload.title.clone(),
        url: payload.url.clone(),
        description: payload.description.clone(),
        topic_index: payload.topic_index,
    };
    let course =
        mutate_roadmap(&state, &course_id, |draft| draft.add_video(phase_number, video.clone()))
            .await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn remove_video(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path((course_id, phase_number, video_id)): Path<(String, i32, String)>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course =
        mutate_roadmap(&state, &course_id, |draft| draft.remove_video(phase_number, &video_id))
            .await?;
    Ok(Json(CourseResponse::from_db(course)))
}

async fn add_material(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path((course_id, phase_number)): Path<(String, i32)>,
    Json(payload): Json<MaterialCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let material = Material {
        id: Uuid::new_v4().to_string(),
        title: payload.title.clone(),
        kind: payload.kind,
        url: payload.url.clone(),
        description: payload.description.clone(),
    };
    let course = mutate_roadmap(&state, &course_id, |draft| {
        draft.add_material(phase_number, material.clone())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn remove_material(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path((course_id, phase_number, material_id)): Path<(String, i32, String)>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = mutate_roadmap(&state, &course_id, |draft| {
        draft.remove_material(phase_number, &material_id)
    })
    .await?;
    Ok(Json(CourseResponse::from_db(course)))
}

async fn set_payment_link(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(course_id): Path<String>,
    Json(payload): Json<PaymentLinkUpsert>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_course(&state, &course_id).await?;

    repositories::payment_links::upsert(
        state.db(),
        &course_id,
        &payload.checkout_url,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save payment link"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn clear_payment_link(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(course_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    repositories::payment_links::delete(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete payment link"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load the course, apply one edit to a draft of its roadmap, then commit the
/// whole draft back in a single UPDATE. The stored roadmap never sees a
/// half-applied edit.
async fn mutate_roadmap(
    state: &AppState,
    course_id: &str,
    edit: impl FnOnce(&mut RoadmapDraft) -> Result<(), RoadmapError>,
) -> Result<Course, ApiError> {
    let course = fetch_course(state, course_id).await?;

    let mut draft = RoadmapDraft::snapshot(&course);
    edit(&mut draft).map_err(roadmap_error)?;

    repositories::courses::replace_roadmap(
        state.db(),
        course_id,
        draft.into_phases(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save roadmap"))?;

    fetch_course(state, course_id).await
}

async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}

// Postgres foreign key violation.
const FK_VIOLATION: &str = "23503";

fn delete_course_error(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FK_VIOLATION) {
            return ApiError::Conflict(
                "Course has enrollments or payments and cannot be deleted".to_string(),
            );
        }
    }
    ApiError::internal(err, "Failed to delete course")
}

fn roadmap_error(err: RoadmapError) -> ApiError {
    match err {
        RoadmapError::MissingField(_) => ApiError::BadRequest(err.to_string()),
        RoadmapError::DuplicatePhase(_) => ApiError::Conflict(err.to_string()),
        RoadmapError::PhaseNotFound(_)
        | RoadmapError::VideoNotFound(_)
        | RoadmapError::MaterialNotFound(_) => ApiError::NotFound(err.to_string()),
    }
}
