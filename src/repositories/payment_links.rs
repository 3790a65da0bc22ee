use sqlx::PgPool;

use crate::db::models::CoursePaymentLink;

pub(crate) async fn upsert(
    pool: &PgPool,
    course_id: &str,
    checkout_url: &str,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO course_payment_links (course_id, checkout_url, updated_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (course_id)
         DO UPDATE SET checkout_url = EXCLUDED.checkout_url,
                       updated_at = EXCLUDED.updated_at",
    )
    .bind(course_id)
    .bind(checkout_url)
    .bind(updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn find_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<CoursePaymentLink>, sqlx::Error> {
    sqlx::query_as::<_, CoursePaymentLink>(
        "SELECT course_id, checkout_url, updated_at
         FROM course_payment_links
         WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, course_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_payment_links WHERE course_id = $1")
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
