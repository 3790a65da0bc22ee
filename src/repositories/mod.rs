pub(crate) mod assessments;
pub(crate) mod courses;
pub(crate) mod enrollment_forms;
pub(crate) mod enrollments;
pub(crate) mod live_meetings;
pub(crate) mod payment_links;
pub(crate) mod payments;
pub(crate) mod users;
