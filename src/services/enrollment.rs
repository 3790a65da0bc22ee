use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Address, EducationDetail, Enrollment};
use crate::db::types::FormType;
use crate::repositories;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum EnrollmentError {
    #[error("current address is required when it differs from the permanent address")]
    CurrentAddressRequired,
}

#[derive(Debug, PartialEq)]
pub(crate) struct SubmissionOutcome {
    pub(crate) next_step: &'static str,
    pub(crate) payment_route: Option<String>,
}

/// Course applications continue to the payment step; job applications are
/// complete once submitted.
pub(crate) fn submission_outcome(form_type: FormType, related_id: &str) -> SubmissionOutcome {
    match form_type {
        FormType::Course => SubmissionOutcome {
            next_step: "payment",
            payment_route: Some(format!("/payment/{related_id}")),
        },
        FormType::Job => SubmissionOutcome { next_step: "done", payment_route: None },
    }
}

/// When the student marks both addresses the same, the permanent address is
/// copied into the current one at submission time, so the stored addresses
/// match regardless of what the client sent.
pub(crate) fn resolve_addresses(
    permanent: Address,
    current: Option<Address>,
    is_same_address: bool,
) -> Result<(Address, Address), EnrollmentError> {
    if is_same_address {
        let copy = permanent.clone();
        return Ok((permanent, copy));
    }
    let current = current.ok_or(EnrollmentError::CurrentAddressRequired)?;
    Ok((permanent, current))
}

/// An optional education block is persisted whenever any of its fields is
/// filled in, even partially; an entirely blank block is dropped.
pub(crate) fn normalize_optional_block(block: Option<EducationDetail>) -> Option<EducationDetail> {
    let block = block?;
    let has_content = [
        &block.institution_name,
        &block.board_university,
        &block.year_of_passing,
        &block.total_marks,
        &block.obtained_marks,
        &block.document_url,
    ]
    .into_iter()
    .any(|field| field.as_deref().is_some_and(|value| !value.trim().is_empty()));

    has_content.then_some(block)
}

/// Idempotent Enrolled transition: the unique `(student_id, course_id)`
/// constraint turns a repeated confirmation into a no-op that returns the
/// existing record. The boolean reports whether a new row was created.
pub(crate) async fn create_enrollment(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<(Enrollment, bool), sqlx::Error> {
    let inserted = repositories::enrollments::insert_if_absent(
        pool,
        repositories::enrollments::CreateEnrollment {
            id: &Uuid::new_v4().to_string(),
            student_id,
            course_id,
            enrollment_date: primitive_now_utc(),
        },
    )
    .await?;

    if let Some(enrollment) = inserted {
        metrics::counter!("enrollments_created_total").increment(1);
        return Ok((enrollment, true));
    }

    let existing =
        repositories::enrollments::find_for_student_course(pool, student_id, course_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
    Ok((existing, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: &str) -> Address {
        Address {
            line1: "12 MG Road".to_string(),
            line2: None,
            city: city.to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn course_forms_route_to_payment() {
        let outcome = submission_outcome(FormType::Course, "c1");
        assert_eq!(outcome.next_step, "payment");
        assert_eq!(outcome.payment_route.as_deref(), Some("/payment/c1"));
    }

    #[test]
    fn job_forms_finish_without_payment() {
        let outcome = submission_outcome(FormType::Job, "j1");
        assert_eq!(outcome.next_step, "done");
        assert!(outcome.payment_route.is_none());
    }

    #[test]
    fn same_address_copies_permanent_into_current() {
        let (permanent, current) =
            resolve_addresses(address("Bengaluru"), None, true).expect("addresses");
        assert_eq!(permanent, current);
    }

    #[test]
    fn same_address_overrides_a_divergent_current_address() {
        let (permanent, current) =
            resolve_addresses(address("Bengaluru"), Some(address("Mysuru")), true)
                .expect("addresses");
        assert_eq!(permanent, current);
        assert_eq!(current.city, "Bengaluru");
    }

    #[test]
    fn distinct_current_address_is_required_when_not_same() {
        let err = resolve_addresses(address("Bengaluru"), None, false).unwrap_err();
        assert_eq!(err, EnrollmentError::CurrentAddressRequired);

        let (_, current) =
            resolve_addresses(address("Bengaluru"), Some(address("Mysuru")), false)
                .expect("addresses");
        assert_eq!(current.city, "Mysuru");
    }

    #[test]
    fn blank_optional_block_is_dropped() {
        let blank = EducationDetail {
            institution_name: Some("  ".to_string()),
            board_university: None,
            year_of_passing: None,
            total_marks: None,
            obtained_marks: None,
            document_url: None,
        };
        assert!(normalize_optional_block(Some(blank)).is_none());
        assert!(normalize_optional_block(None).is_none());
    }

    #[test]
    fn partially_filled_optional_block_is_kept_whole() {
        let partial = EducationDetail {
            institution_name: Some("St. Mary's".to_string()),
            board_university: None,
            year_of_passing: None,
            total_marks: None,
            obtained_marks: None,
            document_url: None,
        };
        let stored = normalize_optional_block(Some(partial)).expect("kept");
        assert_eq!(stored.institution_name.as_deref(), Some("St. Mary's"));
        assert!(stored.board_university.is_none());
    }
}
