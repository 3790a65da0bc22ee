use time::{Duration, PrimitiveDateTime};

use crate::db::models::LiveMeeting;
use crate::db::types::MeetingStatus;

/// Pure derivation of a meeting's status from the clock. Nothing is stored,
/// so there is no stale-status window and no update pass to run: evaluating
/// twice with the same `now` always yields the same answer, and the answer
/// only moves forward as `now` advances.
pub(crate) fn derive(
    scheduled_at: PrimitiveDateTime,
    duration_minutes: i32,
    now: PrimitiveDateTime,
) -> MeetingStatus {
    let ends_at = scheduled_at + Duration::minutes(duration_minutes.max(0) as i64);

    if now < scheduled_at {
        MeetingStatus::Upcoming
    } else if now <= ends_at {
        MeetingStatus::Ongoing
    } else {
        MeetingStatus::Completed
    }
}

pub(crate) fn derive_for(meeting: &LiveMeeting, now: PrimitiveDateTime) -> MeetingStatus {
    derive(meeting.scheduled_at, meeting.duration_minutes, now)
}
