use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Address, EducationDetail, Enrollment, EnrollmentForm, Payment};
use crate::db::types::{FormStatus, FormType, PaymentMethod, PaymentStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
pub(crate) struct AddressInput {
    #[validate(length(min = 1, message = "line1 must not be empty"))]
    pub(crate) line1: String,
    #[serde(default)]
    pub(crate) line2: Option<String>,
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub(crate) city: String,
    #[validate(length(min = 1, message = "state must not be empty"))]
    pub(crate) state: String,
    #[serde(alias = "postalCode", alias = "pincode")]
    #[validate(length(min = 1, message = "postal_code must not be empty"))]
    pub(crate) postal_code: String,
    #[validate(length(min = 1, message = "country must not be empty"))]
    pub(crate) country: String,
}

impl AddressInput {
    pub(crate) fn into_address(self) -> Address {
        Address {
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct EducationDetailInput {
    #[serde(default)]
    #[serde(alias = "institutionName", alias = "schoolName")]
    pub(crate) institution_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "boardUniversity", alias = "board")]
    pub(crate) board_university: Option<String>,
    #[serde(default)]
    #[serde(alias = "yearOfPassing", alias = "passingYear")]
    pub(crate) year_of_passing: Option<String>,
    #[serde(default)]
    #[serde(alias = "totalMarks")]
    pub(crate) total_marks: Option<String>,
    #[serde(default)]
    #[serde(alias = "obtainedMarks")]
    pub(crate) obtained_marks: Option<String>,
    #[serde(default)]
    #[serde(alias = "documentUrl")]
    pub(crate) document_url: Option<String>,
}

impl EducationDetailInput {
    pub(crate) fn into_detail(self) -> EducationDetail {
        EducationDetail {
            institution_name: self.institution_name,
            board_university: self.board_university,
            year_of_passing: self.year_of_passing,
            total_marks: self.total_marks,
            obtained_marks: self.obtained_marks,
            document_url: self.document_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EnrollmentFormSubmit {
    #[serde(alias = "formType")]
    pub(crate) form_type: FormType,
    #[serde(alias = "relatedId", alias = "courseId", alias = "jobId")]
    #[validate(length(min = 1, message = "related_id must not be empty"))]
    pub(crate) related_id: String,
    #[serde(alias = "firstName")]
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub(crate) first_name: String,
    #[serde(alias = "lastName")]
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub(crate) last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 10, message = "phone must be at least 10 digits"))]
    pub(crate) phone: String,
    #[serde(alias = "dateOfBirth", alias = "dob")]
    pub(crate) date_of_birth: Date,
    #[validate(length(min = 1, message = "gender must not be empty"))]
    pub(crate) gender: String,
    #[serde(alias = "aadharNumber")]
    #[validate(length(equal = 12, message = "aadhar_number must be 12 digits"))]
    pub(crate) aadhar_number: String,
    #[serde(default)]
    #[serde(alias = "certificateId")]
    pub(crate) certificate_id: Option<String>,
    #[serde(alias = "permanentAddress")]
    #[validate(nested)]
    pub(crate) permanent_address: AddressInput,
    #[serde(default)]
    #[serde(alias = "currentAddress")]
    #[validate(nested)]
    pub(crate) current_address: Option<AddressInput>,
    #[serde(default)]
    #[serde(alias = "isSameAddress", alias = "sameAsPermanent")]
    pub(crate) is_same_address: bool,
    #[serde(alias = "fatherName")]
    #[validate(length(min = 1, message = "father_name must not be empty"))]
    pub(crate) father_name: String,
    #[serde(alias = "motherName")]
    #[validate(length(min = 1, message = "mother_name must not be empty"))]
    pub(crate) mother_name: String,
    #[serde(alias = "guardianPhone")]
    #[validate(length(min = 10, message = "guardian_phone must be at least 10 digits"))]
    pub(crate) guardian_phone: String,
    #[serde(default)]
    #[serde(alias = "guardianEmail")]
    pub(crate) guardian_email: Option<String>,
    #[serde(alias = "tenthGrade", alias = "tenth")]
    #[validate(custom(function = "validate_tenth_grade"))]
    pub(crate) tenth_grade: EducationDetailInput,
    #[serde(default)]
    #[serde(alias = "twelfthGrade", alias = "twelfth")]
    pub(crate) twelfth_grade: Option<EducationDetailInput>,
    #[serde(default)]
    pub(crate) degree: Option<EducationDetailInput>,
    #[serde(default)]
    #[serde(alias = "postGraduation")]
    pub(crate) post_graduation: Option<EducationDetailInput>,
    #[serde(default)]
    #[serde(alias = "documentUrls")]
    pub(crate) document_urls: Vec<String>,
}

// The tenth-grade block is the only mandatory education detail; it must name
// the institution and the year of passing.
fn validate_tenth_grade(block: &EducationDetailInput) -> Result<(), validator::ValidationError> {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
    if !present(&block.institution_name) {
        return Err(validator::ValidationError::new("tenth_grade")
            .with_message("tenth_grade.institution_name must not be empty".into()));
    }
    if !present(&block.year_of_passing) {
        return Err(validator::ValidationError::new("tenth_grade")
            .with_message("tenth_grade.year_of_passing must not be empty".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentFormResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) form_type: FormType,
    pub(crate) related_id: String,
    pub(crate) status: FormStatus,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) is_same_address: bool,
    pub(crate) submitted_at: String,
    pub(crate) next_step: &'static str,
    pub(crate) payment_route: Option<String>,
}

impl EnrollmentFormResponse {
    pub(crate) fn from_db(
        form: EnrollmentForm,
        next_step: &'static str,
        payment_route: Option<String>,
    ) -> Self {
        Self {
            id: form.id,
            student_id: form.student_id,
            form_type: form.form_type,
            related_id: form.related_id,
            status: form.status,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            is_same_address: form.is_same_address,
            submitted_at: format_primitive(form.submitted_at),
            next_step,
            payment_route,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormStatusUpdate {
    pub(crate) status: FormStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) enrollment_date: String,
    pub(crate) progress: i32,
    pub(crate) completed: bool,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            enrollment_date: format_primitive(enrollment.enrollment_date),
            progress: enrollment.progress,
            completed: enrollment.completed,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProgressUpdate {
    #[validate(range(min = 0, max = 100, message = "progress must be between 0 and 100"))]
    pub(crate) progress: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentConfirmRequest {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[serde(alias = "paymentMethod")]
    pub(crate) method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentOptionsResponse {
    pub(crate) course_id: String,
    pub(crate) amount: i64,
    pub(crate) amount_label: String,
    pub(crate) checkout_url: Option<String>,
    pub(crate) bank_instructions: String,
    pub(crate) cash_instructions: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentConfirmResponse {
    pub(crate) payment_id: String,
    pub(crate) status: PaymentStatus,
    pub(crate) method: PaymentMethod,
    pub(crate) amount: i64,
    pub(crate) instructions: Option<String>,
    pub(crate) enrollment: EnrollmentResponse,
    pub(crate) newly_enrolled: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) student_id: String,
    pub(crate) amount: i64,
    pub(crate) status: PaymentStatus,
    pub(crate) method: PaymentMethod,
    pub(crate) created_at: String,
}

impl PaymentResponse {
    pub(crate) fn from_db(payment: Payment) -> Self {
        Self {
            id: payment.id,
            course_id: payment.course_id,
            student_id: payment.student_id,
            amount: payment.amount,
            status: payment.status,
            method: payment.method,
            created_at: format_primitive(payment.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PaymentLinkUpsert {
    #[serde(alias = "checkoutUrl")]
    #[validate(url(message = "checkout_url must be a valid URL"))]
    pub(crate) checkout_url: String,
}
