use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::{Address, EducationDetail, EnrollmentForm};
use crate::db::types::{FormStatus, FormType};

const FORM_COLUMNS: &str = "id, student_id, form_type, related_id, status, first_name, \
     last_name, email, phone, date_of_birth, gender, aadhar_number, certificate_id, \
     permanent_address, current_address, is_same_address, father_name, mother_name, \
     guardian_phone, guardian_email, tenth_grade, twelfth_grade, degree, post_graduation, \
     document_urls, submitted_at";

pub(crate) struct CreateEnrollmentForm<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) form_type: FormType,
    pub(crate) related_id: &'a str,
    pub(crate) status: FormStatus,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) phone: &'a str,
    pub(crate) date_of_birth: time::Date,
    pub(crate) gender: &'a str,
    pub(crate) aadhar_number: &'a str,
    pub(crate) certificate_id: Option<&'a str>,
    pub(crate) permanent_address: Address,
    pub(crate) current_address: Address,
    pub(crate) is_same_address: bool,
    pub(crate) father_name: &'a str,
    pub(crate) mother_name: &'a str,
    pub(crate) guardian_phone: &'a str,
    pub(crate) guardian_email: Option<&'a str>,
    pub(crate) tenth_grade: EducationDetail,
    pub(crate) twelfth_grade: Option<EducationDetail>,
    pub(crate) degree: Option<EducationDetail>,
    pub(crate) post_graduation: Option<EducationDetail>,
    pub(crate) document_urls: Vec<String>,
    pub(crate) submitted_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEnrollmentForm<'_>,
) -> Result<EnrollmentForm, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentForm>(&format!(
        "INSERT INTO enrollment_forms (
            id, student_id, form_type, related_id, status, first_name, last_name, email,
            phone, date_of_birth, gender, aadhar_number, certificate_id, permanent_address,
            current_address, is_same_address, father_name, mother_name, guardian_phone,
            guardian_email, tenth_grade, twelfth_grade, degree, post_graduation,
            document_urls, submitted_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,
                   $21,$22,$23,$24,$25,$26)
         RETURNING {FORM_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.student_id)
    .bind(params.form_type)
    .bind(params.related_id)
    .bind(params.status)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.email)
    .bind(params.phone)
    .bind(params.date_of_birth)
    .bind(params.gender)
    .bind(params.aadhar_number)
    .bind(params.certificate_id)
    .bind(Json(params.permanent_address))
    .bind(Json(params.current_address))
    .bind(params.is_same_address)
    .bind(params.father_name)
    .bind(params.mother_name)
    .bind(params.guardian_phone)
    .bind(params.guardian_email)
    .bind(Json(params.tenth_grade))
    .bind(params.twelfth_grade.map(Json))
    .bind(params.degree.map(Json))
    .bind(params.post_graduation.map(Json))
    .bind(Json(params.document_urls))
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    form_id: &str,
) -> Result<Option<EnrollmentForm>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentForm>(&format!(
        "SELECT {FORM_COLUMNS} FROM enrollment_forms WHERE id = $1"
    ))
    .bind(form_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<EnrollmentForm>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentForm>(&format!(
        "SELECT {FORM_COLUMNS} FROM enrollment_forms
         WHERE student_id = $1
         ORDER BY submitted_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<EnrollmentForm>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentForm>(&format!(
        "SELECT {FORM_COLUMNS} FROM enrollment_forms ORDER BY submitted_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn update_status(
    pool: &PgPool,
    form_id: &str,
    status: FormStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE enrollment_forms SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(form_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
