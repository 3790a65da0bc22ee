use sqlx::PgPool;

use crate::db::models::Enrollment;

const ENROLLMENT_COLUMNS: &str =
    "id, student_id, course_id, enrollment_date, progress, completed";

pub(crate) struct CreateEnrollment<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) enrollment_date: time::PrimitiveDateTime,
}

/// Insert guarded by the `(student_id, course_id)` unique constraint; a
/// duplicate attempt inserts nothing and the caller re-reads the existing row.
pub(crate) async fn insert_if_absent(
    pool: &PgPool,
    params: CreateEnrollment<'_>,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (id, student_id, course_id, enrollment_date, progress, completed)
         VALUES ($1,$2,$3,$4,0,FALSE)
         ON CONFLICT (student_id, course_id) DO NOTHING
         RETURNING {ENROLLMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.student_id)
    .bind(params.course_id)
    .bind(params.enrollment_date)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_for_student_course(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
         WHERE student_id = $1 AND course_id = $2"
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
         WHERE student_id = $1
         ORDER BY enrollment_date DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn enrolled_course_ids(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT course_id FROM enrollments WHERE student_id = $1")
        .bind(student_id)
        .fetch_all(pool)
        .await
}

pub(crate) async fn update_progress(
    pool: &PgPool,
    enrollment_id: &str,
    progress: i32,
    completed: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE enrollments SET progress = $1, completed = $2 WHERE id = $3",
    )
    .bind(progress)
    .bind(completed)
    .bind(enrollment_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
