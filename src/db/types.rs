use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "courselevel", rename_all = "lowercase")]
pub(crate) enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "assessmenttype", rename_all = "kebab-case")]
pub(crate) enum AssessmentType {
    Quiz,
    CodingChallenge,
    Project,
    Exam,
}

impl AssessmentType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            AssessmentType::Quiz => "quiz",
            AssessmentType::CodingChallenge => "coding-challenge",
            AssessmentType::Project => "project",
            AssessmentType::Exam => "exam",
        }
    }
}

/// Kind of a roadmap material. Lives inside the roadmap JSONB, not a SQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MaterialKind {
    Document,
    Link,
}

/// Derived at read time from `scheduled_at + duration` versus now; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MeetingStatus {
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "formtype", rename_all = "lowercase")]
pub(crate) enum FormType {
    Course,
    Job,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "formstatus", rename_all = "lowercase")]
pub(crate) enum FormStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "paymentstatus", rename_all = "lowercase")]
pub(crate) enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "paymentmethod", rename_all = "lowercase")]
pub(crate) enum PaymentMethod {
    Online,
    Bank,
    Cash,
}
