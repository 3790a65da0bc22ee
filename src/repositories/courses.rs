use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::{Course, Phase};
use crate::db::types::CourseLevel;

const COURSE_COLUMNS: &str = "id, title, description, duration, level, price, instructor, \
     category, image_url, is_published, roadmap, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) duration: &'a str,
    pub(crate) level: CourseLevel,
    pub(crate) price: i64,
    pub(crate) instructor: Option<&'a str>,
    pub(crate) category: Option<&'a str>,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) is_published: bool,
    pub(crate) roadmap: Vec<Phase>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateCourse {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) duration: Option<String>,
    pub(crate) level: Option<CourseLevel>,
    pub(crate) price: Option<i64>,
    pub(crate) instructor: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) is_published: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, title, description, duration, level, price, instructor, category,
            image_url, is_published, roadmap, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.duration)
    .bind(params.level)
    .bind(params.price)
    .bind(params.instructor)
    .bind(params.category)
    .bind(params.image_url)
    .bind(params.is_published)
    .bind(Json(params.roadmap))
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, course_id: &str) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_published(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE is_published ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: &str,
    params: UpdateCourse,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            duration = COALESCE($3, duration),
            level = COALESCE($4, level),
            price = COALESCE($5, price),
            instructor = COALESCE($6, instructor),
            category = COALESCE($7, category),
            image_url = COALESCE($8, image_url),
            is_published = COALESCE($9, is_published),
            updated_at = $10
         WHERE id = $11",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.duration)
    .bind(params.level)
    .bind(params.price)
    .bind(params.instructor)
    .bind(params.category)
    .bind(params.image_url)
    .bind(params.is_published)
    .bind(params.updated_at)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn replace_roadmap(
    pool: &PgPool,
    course_id: &str,
    roadmap: Vec<Phase>,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET roadmap = $1, updated_at = $2 WHERE id = $3")
        .bind(Json(roadmap))
        .bind(updated_at)
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, course_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1").bind(course_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn exists(pool: &PgPool, course_id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}
