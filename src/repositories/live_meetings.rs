use sqlx::PgPool;

use crate::db::models::LiveMeeting;

const MEETING_COLUMNS: &str = "id, course_id, title, description, host_name, scheduled_at, \
     duration_minutes, meeting_link, max_participants, is_recording, created_at, updated_at";

pub(crate) struct CreateLiveMeeting<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) host_name: &'a str,
    pub(crate) scheduled_at: time::PrimitiveDateTime,
    pub(crate) duration_minutes: i32,
    pub(crate) meeting_link: &'a str,
    pub(crate) max_participants: i32,
    pub(crate) is_recording: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateLiveMeeting {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) host_name: Option<String>,
    pub(crate) scheduled_at: Option<time::PrimitiveDateTime>,
    pub(crate) duration_minutes: Option<i32>,
    pub(crate) meeting_link: Option<String>,
    pub(crate) max_participants: Option<i32>,
    pub(crate) is_recording: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateLiveMeeting<'_>,
) -> Result<LiveMeeting, sqlx::Error> {
    sqlx::query_as::<_, LiveMeeting>(&format!(
        "INSERT INTO live_meetings (
            id, course_id, title, description, host_name, scheduled_at, duration_minutes,
            meeting_link, max_participants, is_recording, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
         RETURNING {MEETING_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.host_name)
    .bind(params.scheduled_at)
    .bind(params.duration_minutes)
    .bind(params.meeting_link)
    .bind(params.max_participants)
    .bind(params.is_recording)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    meeting_id: &str,
) -> Result<Option<LiveMeeting>, sqlx::Error> {
    sqlx::query_as::<_, LiveMeeting>(&format!(
        "SELECT {MEETING_COLUMNS} FROM live_meetings WHERE id = $1"
    ))
    .bind(meeting_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<LiveMeeting>, sqlx::Error> {
    sqlx::query_as::<_, LiveMeeting>(&format!(
        "SELECT {MEETING_COLUMNS} FROM live_meetings ORDER BY scheduled_at"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_courses(
    pool: &PgPool,
    course_ids: &[String],
) -> Result<Vec<LiveMeeting>, sqlx::Error> {
    sqlx::query_as::<_, LiveMeeting>(&format!(
        "SELECT {MEETING_COLUMNS} FROM live_meetings
         WHERE course_id = ANY($1)
         ORDER BY scheduled_at"
    ))
    .bind(course_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    meeting_id: &str,
    params: UpdateLiveMeeting,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE live_meetings SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            host_name = COALESCE($3, host_name),
            scheduled_at = COALESCE($4, scheduled_at),
            duration_minutes = COALESCE($5, duration_minutes),
            meeting_link = COALESCE($6, meeting_link),
            max_participants = COALESCE($7, max_participants),
            is_recording = COALESCE($8, is_recording),
            updated_at = $9
         WHERE id = $10",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.host_name)
    .bind(params.scheduled_at)
    .bind(params.duration_minutes)
    .bind(params.meeting_link)
    .bind(params.max_participants)
    .bind(params.is_recording)
    .bind(params.updated_at)
    .bind(meeting_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, meeting_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM live_meetings WHERE id = $1").bind(meeting_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
