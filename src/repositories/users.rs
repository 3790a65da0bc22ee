use sqlx::PgPool;

use crate::db::models::User;
use crate::db::types::UserRole;

const USER_COLUMNS: &str =
    "id, email, hashed_password, full_name, role, is_active, created_at, updated_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) id: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) full_name: &'a str,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            id, email, hashed_password, full_name, role, is_active, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {USER_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.full_name)
    .bind(params.role)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}
