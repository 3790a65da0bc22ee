use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{
    AssessmentType, CourseLevel, FormStatus, FormType, MaterialKind, PaymentMethod, PaymentStatus,
    UserRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) duration: String,
    pub(crate) level: CourseLevel,
    pub(crate) price: i64,
    pub(crate) instructor: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) roadmap: Json<Vec<Phase>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// One ordered stage of a course curriculum. Owned by exactly one course;
/// lives inside the course's roadmap JSONB with no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Phase {
    pub(crate) phase: i32,
    pub(crate) title: String,
    pub(crate) duration: String,
    #[serde(default)]
    pub(crate) topics: Vec<String>,
    #[serde(default)]
    pub(crate) projects: Vec<String>,
    #[serde(default)]
    pub(crate) videos: Vec<Video>,
    #[serde(default)]
    pub(crate) materials: Vec<Material>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Video {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) topic_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Material {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) kind: MaterialKind,
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assessment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: AssessmentType,
    pub(crate) questions: Json<Vec<serde_json::Value>>,
    pub(crate) duration_minutes: i32,
    pub(crate) passing_score: i32,
    pub(crate) total_marks: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct LiveMeeting {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) host_name: String,
    pub(crate) scheduled_at: PrimitiveDateTime,
    pub(crate) duration_minutes: i32,
    pub(crate) meeting_link: String,
    pub(crate) max_participants: i32,
    pub(crate) is_recording: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Address {
    pub(crate) line1: String,
    #[serde(default)]
    pub(crate) line2: Option<String>,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) postal_code: String,
    pub(crate) country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EducationDetail {
    #[serde(default)]
    pub(crate) institution_name: Option<String>,
    #[serde(default)]
    pub(crate) board_university: Option<String>,
    #[serde(default)]
    pub(crate) year_of_passing: Option<String>,
    #[serde(default)]
    pub(crate) total_marks: Option<String>,
    #[serde(default)]
    pub(crate) obtained_marks: Option<String>,
    #[serde(default)]
    pub(crate) document_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct EnrollmentForm {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) form_type: FormType,
    pub(crate) related_id: String,
    pub(crate) status: FormStatus,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) date_of_birth: Date,
    pub(crate) gender: String,
    pub(crate) aadhar_number: String,
    pub(crate) certificate_id: Option<String>,
    pub(crate) permanent_address: Json<Address>,
    pub(crate) current_address: Json<Address>,
    pub(crate) is_same_address: bool,
    pub(crate) father_name: String,
    pub(crate) mother_name: String,
    pub(crate) guardian_phone: String,
    pub(crate) guardian_email: Option<String>,
    pub(crate) tenth_grade: Json<EducationDetail>,
    pub(crate) twelfth_grade: Option<Json<EducationDetail>>,
    pub(crate) degree: Option<Json<EducationDetail>>,
    pub(crate) post_graduation: Option<Json<EducationDetail>>,
    pub(crate) document_urls: Json<Vec<String>>,
    pub(crate) submitted_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) enrollment_date: PrimitiveDateTime,
    pub(crate) progress: i32,
    pub(crate) completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Payment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) student_id: String,
    pub(crate) amount: i64,
    pub(crate) status: PaymentStatus,
    pub(crate) method: PaymentMethod,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CoursePaymentLink {
    pub(crate) course_id: String,
    pub(crate) checkout_url: String,
    pub(crate) updated_at: PrimitiveDateTime,
}
