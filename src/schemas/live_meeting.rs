use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time,
};
use validator::Validate;

use crate::core::time::{format_primitive, to_primitive_utc};
use crate::db::models::LiveMeeting;
use crate::db::types::MeetingStatus;

/// Sessions may be scheduled either with a single `scheduledDate` timestamp or
/// with the legacy `date` + `time` pair; `resolved_schedule` reconciles both.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LiveMeetingCreate {
    #[serde(default)]
    #[serde(alias = "courseId")]
    pub(crate) course_id: Option<String>,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "hostName", alias = "instructor")]
    #[validate(length(min = 1, message = "host_name must not be empty"))]
    pub(crate) host_name: String,
    #[serde(default)]
    #[serde(
        alias = "scheduledDate",
        alias = "scheduledAt",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) scheduled_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) date: Option<Date>,
    #[serde(default)]
    pub(crate) time: Option<String>,
    #[serde(default = "default_duration")]
    #[serde(alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: i32,
    #[serde(alias = "meetingLink")]
    #[validate(length(min = 1, message = "meeting_link must not be empty"))]
    pub(crate) meeting_link: String,
    #[serde(default = "default_max_participants")]
    #[serde(alias = "maxParticipants")]
    #[validate(range(min = 1, message = "max_participants must be positive"))]
    pub(crate) max_participants: i32,
    #[serde(default)]
    #[serde(alias = "isRecording")]
    pub(crate) is_recording: bool,
}

impl LiveMeetingCreate {
    /// Single timestamp wins; otherwise the legacy pair is combined. Returns
    /// an error message when neither form supplies a schedule.
    pub(crate) fn resolved_schedule(&self) -> Result<PrimitiveDateTime, &'static str> {
        if let Some(at) = self.scheduled_at {
            return Ok(to_primitive_utc(at));
        }
        let date = self.date.ok_or("scheduled_at or date is required")?;
        let raw_time = self.time.as_deref().ok_or("time is required alongside date")?;
        Ok(PrimitiveDateTime::new(date, parse_clock_time(raw_time)?))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LiveMeetingUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "hostName", alias = "instructor")]
    pub(crate) host_name: Option<String>,
    #[serde(default)]
    #[serde(
        alias = "scheduledDate",
        alias = "scheduledAt",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) scheduled_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) date: Option<Date>,
    #[serde(default)]
    pub(crate) time: Option<String>,
    #[serde(default)]
    #[serde(alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: Option<i32>,
    #[serde(default)]
    #[serde(alias = "meetingLink")]
    pub(crate) meeting_link: Option<String>,
    #[serde(default)]
    #[serde(alias = "maxParticipants")]
    pub(crate) max_participants: Option<i32>,
    #[serde(default)]
    #[serde(alias = "isRecording")]
    pub(crate) is_recording: Option<bool>,
}

impl LiveMeetingUpdate {
    /// Same reconciliation as on create: the single timestamp wins, a full
    /// legacy pair reschedules, and an absent schedule leaves it untouched.
    pub(crate) fn resolved_schedule(&self) -> Result<Option<PrimitiveDateTime>, &'static str> {
        if let Some(at) = self.scheduled_at {
            return Ok(Some(to_primitive_utc(at)));
        }
        match (self.date, self.time.as_deref()) {
            (None, None) => Ok(None),
            (Some(date), Some(raw_time)) => {
                Ok(Some(PrimitiveDateTime::new(date, parse_clock_time(raw_time)?)))
            }
            _ => Err("date and time must be provided together"),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LiveMeetingResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) host_name: String,
    pub(crate) scheduled_at: String,
    pub(crate) duration_minutes: i32,
    pub(crate) meeting_link: String,
    pub(crate) max_participants: i32,
    pub(crate) is_recording: bool,
    pub(crate) status: MeetingStatus,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl LiveMeetingResponse {
    pub(crate) fn from_db(meeting: LiveMeeting, status: MeetingStatus) -> Self {
        Self {
            id: meeting.id,
            course_id: meeting.course_id,
            title: meeting.title,
            description: meeting.description,
            host_name: meeting.host_name,
            scheduled_at: format_primitive(meeting.scheduled_at),
            duration_minutes: meeting.duration_minutes,
            meeting_link: meeting.meeting_link,
            max_participants: meeting.max_participants,
            is_recording: meeting.is_recording,
            status,
            created_at: format_primitive(meeting.created_at),
            updated_at: format_primitive(meeting.updated_at),
        }
    }
}

fn default_duration() -> i32 {
    60
}

fn default_max_participants() -> i32 {
    100
}

fn parse_clock_time(raw: &str) -> Result<Time, &'static str> {
    Time::parse(raw, &format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(raw, &format_description!("[hour]:[minute]:[second]")))
        .map_err(|_| "time must be HH:MM")
}

fn parse_offset_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // Frontend's datetime-local often sends without timezone.
    if raw.len() == 16 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}:00Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    if raw.len() == 19 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    if let Ok(value) =
        PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    {
        return Some(value.assume_utc());
    }

    None
}

fn deserialize_option_offset_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_offset_datetime_flexible(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn base_body() -> serde_json::Value {
        serde_json::json!({
            "title": "Ownership deep dive",
            "hostName": "Priya",
            "meetingLink": "https://meet.example.com/abc"
        })
    }

    #[test]
    fn single_timestamp_wins_over_legacy_pair() {
        let mut body = base_body();
        body["scheduledDate"] = serde_json::json!("2026-09-01T10:00:00Z");
        body["date"] = serde_json::json!("2026-12-25");
        body["time"] = serde_json::json!("08:30");
        let parsed: LiveMeetingCreate = serde_json::from_value(body).expect("deserialize");
        assert_eq!(parsed.resolved_schedule().expect("schedule"), datetime!(2026-09-01 10:00));
    }

    #[test]
    fn legacy_date_time_pair_is_combined() {
        let mut body = base_body();
        body["date"] = serde_json::json!("2026-12-25");
        body["time"] = serde_json::json!("08:30");
        let parsed: LiveMeetingCreate = serde_json::from_value(body).expect("deserialize");
        assert_eq!(parsed.resolved_schedule().expect("schedule"), datetime!(2026-12-25 08:30));
    }

    #[test]
    fn timezone_less_timestamps_are_assumed_utc() {
        let mut body = base_body();
        body["scheduledDate"] = serde_json::json!("2026-09-01T10:00");
        let parsed: LiveMeetingCreate = serde_json::from_value(body).expect("deserialize");
        assert_eq!(parsed.resolved_schedule().expect("schedule"), datetime!(2026-09-01 10:00));
    }

    #[test]
    fn missing_schedule_is_rejected() {
        let parsed: LiveMeetingCreate = serde_json::from_value(base_body()).expect("deserialize");
        assert!(parsed.resolved_schedule().is_err());
    }

    #[test]
    fn update_with_legacy_pair_reschedules() {
        let body = serde_json::json!({ "date": "2026-12-25", "time": "08:30" });
        let parsed: LiveMeetingUpdate = serde_json::from_value(body).expect("deserialize");
        assert_eq!(
            parsed.resolved_schedule().expect("schedule"),
            Some(datetime!(2026-12-25 08:30))
        );
    }

    #[test]
    fn update_without_schedule_leaves_it_unchanged() {
        let body = serde_json::json!({ "title": "Renamed" });
        let parsed: LiveMeetingUpdate = serde_json::from_value(body).expect("deserialize");
        assert_eq!(parsed.resolved_schedule().expect("schedule"), None);
    }

    #[test]
    fn update_with_half_a_pair_is_rejected() {
        let body = serde_json::json!({ "date": "2026-12-25" });
        let parsed: LiveMeetingUpdate = serde_json::from_value(body).expect("deserialize");
        assert!(parsed.resolved_schedule().is_err());
    }

    #[test]
    fn instructor_alias_maps_to_host_name() {
        let body = serde_json::json!({
            "title": "Q&A",
            "instructor": "Arun",
            "meetingLink": "https://meet.example.com/qna",
            "scheduledAt": "2026-09-01T10:00:00Z"
        });
        let parsed: LiveMeetingCreate = serde_json::from_value(body).expect("deserialize");
        assert_eq!(parsed.host_name, "Arun");
    }
}
