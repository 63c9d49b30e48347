use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use crate::error::ValidationError;
use crate::models::{CandidateId, CandidateMatchStatus, CandidateProfile, Meeting};
use crate::urls::encode_form;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses backend timestamps. Values without a zone are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// The viewer's time zone, as offsets in `Date.getTimezoneOffset()` minutes
/// (UTC minus local). Offsets are asked for the instant being converted, so
/// a daylight-saving change between today and that instant is honoured.
pub trait LocalZone {
    fn offset_at_utc(&self, instant: DateTime<Utc>) -> i32;
    fn offset_at_local(&self, local: NaiveDateTime) -> i32;
}

/// A zone without daylight saving.
impl LocalZone for i32 {
    fn offset_at_utc(&self, _instant: DateTime<Utc>) -> i32 {
        *self
    }

    fn offset_at_local(&self, _local: NaiveDateTime) -> i32 {
        *self
    }
}

fn fixed(offset_minutes: i32) -> FixedOffset {
    FixedOffset::west_opt(offset_minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// Medium date, short time in the viewer's zone, e.g. `Mar 1, 2025, 3:30 PM`.
pub fn format_meeting_time(value: &str, zone: impl LocalZone) -> String {
    if value.trim().is_empty() {
        return "Unknown Time".to_string();
    }
    match parse_timestamp(value) {
        Some(utc) => utc
            .with_timezone(&fixed(zone.offset_at_utc(utc)))
            .format("%b %-d, %Y, %-I:%M %p")
            .to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Converts a `datetime-local` input value to the ISO-8601 UTC string the
/// scheduling endpoint expects.
pub fn local_input_to_utc(value: &str, zone: impl LocalZone) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingMeetingTime);
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidMeetingTime(value.to_string()))?;
    let utc = naive + Duration::minutes(i64::from(zone.offset_at_local(naive)));
    Ok(Utc
        .from_utc_datetime(&utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingMeeting {
    pub meeting: Meeting,
    pub candidate_name: String,
}

/// Meetings at or after `now`, labelled with the candidate's first name.
pub fn upcoming_meetings(
    meetings: &[Meeting],
    candidates: &[CandidateMatchStatus],
    now: DateTime<Utc>,
) -> Vec<UpcomingMeeting> {
    meetings
        .iter()
        .filter(|m| parse_timestamp(&m.scheduled_at).is_some_and(|at| at >= now))
        .map(|m| UpcomingMeeting {
            meeting: m.clone(),
            candidate_name: candidates
                .iter()
                .find(|c| c.id == m.candidate_id)
                .map(|c| c.first_name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown Candidate".to_string()),
        })
        .collect()
}

pub fn meetings_for_candidate(meetings: &[Meeting], candidate_id: CandidateId) -> Vec<Meeting> {
    meetings
        .iter()
        .filter(|m| m.candidate_id == candidate_id)
        .cloned()
        .collect()
}

/// Checks the schedule panel inputs and returns the urlencoded body.
pub fn schedule_meeting_body(
    candidate: &CandidateProfile,
    hr_email: Option<&str>,
    local_value: &str,
    zone: impl LocalZone,
) -> Result<String, ValidationError> {
    let candidate_id = candidate.id.ok_or(ValidationError::MissingCandidateId)?;
    if candidate.email.trim().is_empty() {
        return Err(ValidationError::MissingCandidateEmail);
    }
    let hr_email = hr_email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(ValidationError::MissingHrSession)?;
    let start_time = local_input_to_utc(local_value, zone)?;

    Ok(encode_form(&[
        ("candidate_id", candidate_id.to_string()),
        ("candidate_email", candidate.email.trim().to_string()),
        ("interviewer_email", hr_email.to_string()),
        ("start_time", start_time),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(candidate: u64, at: &str) -> Meeting {
        Meeting {
            candidate_id: CandidateId(candidate),
            scheduled_at: at.into(),
            join_url: Some("https://meet.example.com/j/1".into()),
        }
    }

    fn row(id: u64, first: &str) -> CandidateMatchStatus {
        CandidateMatchStatus {
            id: CandidateId(id),
            first_name: first.into(),
            last_name: String::new(),
            email: String::new(),
            verified: false,
            match_found: false,
            confidence_score: None,
            photo: None,
            resume: None,
            id_proof: None,
        }
    }

    #[test]
    fn parses_zoned_and_naive_timestamps() {
        let zoned = parse_timestamp("2025-03-01T10:00:00+05:30").unwrap();
        assert_eq!(zoned.to_rfc3339(), "2025-03-01T04:30:00+00:00");
        let naive = parse_timestamp("2025-03-01 10:00:00").unwrap();
        assert_eq!(naive.to_rfc3339(), "2025-03-01T10:00:00+00:00");
        assert!(parse_timestamp("soon").is_none());
    }

    #[test]
    fn local_input_converts_with_browser_offset() {
        // India is UTC+5:30, so getTimezoneOffset() is -330.
        assert_eq!(
            local_input_to_utc("2025-03-01T10:00", -330).unwrap(),
            "2025-03-01T04:30:00.000Z"
        );
        assert_eq!(local_input_to_utc("", 0), Err(ValidationError::MissingMeetingTime));
    }

    /// US Eastern with the 2025 transitions (Mar 9, Nov 2), enough for
    /// dates in that year.
    struct NewYork2025;

    impl NewYork2025 {
        fn is_summer(local: NaiveDateTime) -> bool {
            let start = NaiveDateTime::parse_from_str("2025-03-09 02:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
            let end = NaiveDateTime::parse_from_str("2025-11-02 02:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
            local >= start && local < end
        }
    }

    impl LocalZone for NewYork2025 {
        fn offset_at_utc(&self, instant: DateTime<Utc>) -> i32 {
            self.offset_at_local((instant - Duration::hours(5)).naive_utc())
        }

        fn offset_at_local(&self, local: NaiveDateTime) -> i32 {
            if Self::is_summer(local) { 240 } else { 300 }
        }
    }

    #[test]
    fn conversion_uses_the_offset_of_the_meeting_date() {
        // Scheduled from July (EDT) for a December (EST) slot.
        assert_eq!(
            local_input_to_utc("2025-12-01T10:00", NewYork2025).unwrap(),
            "2025-12-01T15:00:00.000Z"
        );
        assert_eq!(
            local_input_to_utc("2025-07-01T10:00", NewYork2025).unwrap(),
            "2025-07-01T14:00:00.000Z"
        );
    }

    #[test]
    fn display_uses_the_offset_of_the_meeting_date() {
        assert_eq!(
            format_meeting_time("2025-12-01T15:00:00Z", NewYork2025),
            "Dec 1, 2025, 10:00 AM"
        );
        assert_eq!(
            format_meeting_time("2025-07-01T14:00:00Z", NewYork2025),
            "Jul 1, 2025, 10:00 AM"
        );
    }

    #[test]
    fn upcoming_filters_past_and_names_candidates() {
        let now = parse_timestamp("2025-03-01T00:00:00Z").unwrap();
        let list = upcoming_meetings(
            &[
                meeting(1, "2025-02-28T23:59:00Z"),
                meeting(1, "2025-03-02T09:00:00Z"),
                meeting(2, "2025-03-03T09:00:00Z"),
                meeting(3, "not a date"),
            ],
            &[row(1, "Ana")],
            now,
        );

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].candidate_name, "Ana");
        assert_eq!(list[1].candidate_name, "Unknown Candidate");
    }

    #[test]
    fn meeting_time_display() {
        assert_eq!(format_meeting_time("", 0), "Unknown Time");
        assert_eq!(format_meeting_time("garbage", 0), "Invalid Date");
        assert_eq!(
            format_meeting_time("2025-03-01T10:00:00Z", -330),
            "Mar 1, 2025, 3:30 PM"
        );
    }

    #[test]
    fn schedule_body_requires_hr_session() {
        let candidate = CandidateProfile {
            id: Some(CandidateId(4)),
            email: "ana@x.io".into(),
            ..Default::default()
        };
        assert_eq!(
            schedule_meeting_body(&candidate, None, "2025-03-01T10:00", 0),
            Err(ValidationError::MissingHrSession)
        );

        let body = schedule_meeting_body(&candidate, Some("hr@corp.io"), "2025-03-01T10:00", 0).unwrap();
        assert_eq!(
            body,
            "candidate_id=4&candidate_email=ana%40x.io&interviewer_email=hr%40corp.io&start_time=2025-03-01T10%3A00%3A00.000Z"
        );
    }

    #[test]
    fn meetings_are_filtered_per_candidate() {
        let all = [meeting(1, "a"), meeting(2, "b"), meeting(1, "c")];
        assert_eq!(meetings_for_candidate(&all, CandidateId(1)).len(), 2);
    }
}
