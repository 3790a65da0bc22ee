use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Assessment;
use crate::db::types::AssessmentType;

/// Writers may still send the old `duration`/`timeLimit` and
/// `passingScore`/`passingMarks` names; they all land on the canonical
/// `duration_minutes` and `passing_score` fields.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentCreate {
    #[serde(alias = "courseId")]
    #[validate(length(min = 1, message = "course_id must not be empty"))]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(rename = "type")]
    pub(crate) kind: AssessmentType,
    #[serde(default)]
    pub(crate) questions: Vec<serde_json::Value>,
    #[serde(alias = "duration", alias = "timeLimit", alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: i32,
    #[serde(alias = "passingScore", alias = "passingMarks")]
    #[validate(range(min = 0, max = 100, message = "passing_score must be between 0 and 100"))]
    pub(crate) passing_score: i32,
    #[serde(default = "default_total_marks")]
    #[serde(alias = "totalMarks")]
    #[validate(range(min = 1, message = "total_marks must be positive"))]
    pub(crate) total_marks: i32,
    #[serde(default = "default_active")]
    #[serde(alias = "isActive")]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(rename = "type")]
    pub(crate) kind: Option<AssessmentType>,
    #[serde(default)]
    pub(crate) questions: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    #[serde(alias = "duration", alias = "timeLimit", alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: Option<i32>,
    #[serde(default)]
    #[serde(alias = "passingScore", alias = "passingMarks")]
    #[validate(range(min = 0, max = 100, message = "passing_score must be between 0 and 100"))]
    pub(crate) passing_score: Option<i32>,
    #[serde(default)]
    #[serde(alias = "totalMarks")]
    pub(crate) total_marks: Option<i32>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) course_title: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    #[serde(rename = "type")]
    pub(crate) kind: AssessmentType,
    pub(crate) questions: Vec<serde_json::Value>,
    pub(crate) duration_minutes: i32,
    pub(crate) passing_score: i32,
    // Legacy read aliases for clients still bound to the old field names.
    pub(crate) time_limit: i32,
    pub(crate) passing_marks: i32,
    pub(crate) total_marks: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssessmentResponse {
    pub(crate) fn from_db(assessment: Assessment, course_title: String) -> Self {
        Self {
            id: assessment.id,
            course_id: assessment.course_id,
            course_title,
            title: assessment.title,
            description: assessment.description,
            kind: assessment.kind,
            questions: assessment.questions.0,
            duration_minutes: assessment.duration_minutes,
            passing_score: assessment.passing_score,
            time_limit: assessment.duration_minutes,
            passing_marks: assessment.passing_score,
            total_marks: assessment.total_marks,
            is_active: assessment.is_active,
            created_at: format_primitive(assessment.created_at),
            updated_at: format_primitive(assessment.updated_at),
        }
    }
}

fn default_total_marks() -> i32 {
    100
}

fn default_active() -> bool {
    true
}
