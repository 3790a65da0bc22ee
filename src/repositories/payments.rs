use sqlx::PgPool;

use crate::db::models::Payment;
use crate::db::types::{PaymentMethod, PaymentStatus};

const PAYMENT_COLUMNS: &str = "id, course_id, student_id, amount, status, method, created_at";

pub(crate) struct CreatePayment<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) amount: i64,
    pub(crate) status: PaymentStatus,
    pub(crate) method: PaymentMethod,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreatePayment<'_>) -> Result<Payment, sqlx::Error> {
    sqlx::query_as::<_, Payment>(&format!(
        "INSERT INTO payments (id, course_id, student_id, amount, status, method, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {PAYMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.student_id)
    .bind(params.amount)
    .bind(params.status)
    .bind(params.method)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE student_id = $1 ORDER BY created_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}
