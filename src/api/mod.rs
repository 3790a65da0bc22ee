pub(crate) mod assessments;
pub(crate) mod auth;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod live_meetings;
pub(crate) mod router;
