use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Assessment;
use crate::db::types::AssessmentType;

const ASSESSMENT_COLUMNS: &str = "id, course_id, title, description, kind, questions, \
     duration_minutes, passing_score, total_marks, is_active, created_at, updated_at";

pub(crate) struct CreateAssessment<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) kind: AssessmentType,
    pub(crate) questions: Vec<serde_json::Value>,
    pub(crate) duration_minutes: i32,
    pub(crate) passing_score: i32,
    pub(crate) total_marks: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateAssessment {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) kind: Option<AssessmentType>,
    pub(crate) questions: Option<Vec<serde_json::Value>>,
    pub(crate) duration_minutes: Option<i32>,
    pub(crate) passing_score: Option<i32>,
    pub(crate) total_marks: Option<i32>,
    pub(crate) is_active: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssessment<'_>,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "INSERT INTO assessments (
            id, course_id, title, description, kind, questions, duration_minutes,
            passing_score, total_marks, is_active, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
         RETURNING {ASSESSMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.kind)
    .bind(Json(params.questions))
    .bind(params.duration_minutes)
    .bind(params.passing_score)
    .bind(params.total_marks)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

/// The join drops assessments whose course row is gone; orphans are invalid on read.
pub(crate) async fn find_by_id(
    pool: &PgPool,
    assessment_id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {columns} FROM assessments a
         JOIN courses c ON c.id = a.course_id
         WHERE a.id = $1",
        columns = prefixed_columns(),
    ))
    .bind(assessment_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {columns} FROM assessments a
         JOIN courses c ON c.id = a.course_id
         ORDER BY a.created_at DESC",
        columns = prefixed_columns(),
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {columns} FROM assessments a
         JOIN courses c ON c.id = a.course_id
         WHERE a.course_id = $1
         ORDER BY a.created_at DESC",
        columns = prefixed_columns(),
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    assessment_id: &str,
    params: UpdateAssessment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE assessments SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            kind = COALESCE($3, kind),
            questions = COALESCE($4, questions),
            duration_minutes = COALESCE($5, duration_minutes),
            passing_score = COALESCE($6, passing_score),
            total_marks = COALESCE($7, total_marks),
            is_active = COALESCE($8, is_active),
            updated_at = $9
         WHERE id = $10",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.kind)
    .bind(params.questions.map(Json))
    .bind(params.duration_minutes)
    .bind(params.passing_score)
    .bind(params.total_marks)
    .bind(params.is_active)
    .bind(params.updated_at)
    .bind(assessment_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, assessment_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM assessments WHERE id = $1").bind(assessment_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

fn prefixed_columns() -> String {
    ASSESSMENT_COLUMNS
        .split(", ")
        .map(|column| format!("a.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}
