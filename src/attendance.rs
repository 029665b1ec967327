use crate::errors::AttendanceError;
use crate::identity::validate_nickname;
use crate::models::{AppData, DayDocument, Participant, Status};
use crate::variant::Variant;
use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `H:MM`, hour unpadded.
pub fn time_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("{}:{:02}", now.hour(), now.minute())
}

fn date_stamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%a %b %d %Y").to_string()
}

/// The caller's status in a day document, `None` when absent.
pub fn status_of(document: Option<&DayDocument>, nickname: Option<&str>) -> Status {
    let (Some(document), Some(nickname)) = (document, nickname) else {
        return Status::None;
    };
    document
        .participants
        .iter()
        .find(|participant| participant.nickname == nickname)
        .map_or(Status::None, |participant| participant.status)
}

/// Replaces the caller's entry in the day document for `date_key`: any
/// existing entry under `nickname` is dropped and, unless `status` is
/// `none`, a fresh one stamped with the local time is appended.
pub fn apply_status<Tz: TimeZone>(
    data: &mut AppData,
    date_key: &str,
    nickname: &str,
    status: Status,
    now: &DateTime<Tz>,
) -> DayDocument
where
    Tz::Offset: std::fmt::Display,
{
    let mut participants: Vec<Participant> = data
        .attendance
        .get(date_key)
        .map(|document| document.participants.clone())
        .unwrap_or_default();
    participants.retain(|participant| participant.nickname != nickname);

    if status != Status::None {
        participants.push(Participant {
            nickname: nickname.to_string(),
            status,
            time: time_label(now),
        });
    }

    write_day(data, date_key, participants, now)
}

/// Overwrites the day document only when it is still at `expected_revision`.
pub fn replace_day_if<Tz: TimeZone>(
    data: &mut AppData,
    date_key: &str,
    participants: Vec<Participant>,
    expected_revision: u64,
    now: &DateTime<Tz>,
) -> Result<DayDocument, AttendanceError>
where
    Tz::Offset: std::fmt::Display,
{
    let actual = data
        .attendance
        .get(date_key)
        .map_or(0, |document| document.revision);
    if actual != expected_revision {
        return Err(AttendanceError::RevisionConflict {
            date_key: date_key.to_string(),
            expected: expected_revision,
            actual,
        });
    }

    Ok(write_day(data, date_key, participants, now))
}

fn write_day<Tz: TimeZone>(
    data: &mut AppData,
    date_key: &str,
    participants: Vec<Participant>,
    now: &DateTime<Tz>,
) -> DayDocument
where
    Tz::Offset: std::fmt::Display,
{
    let document = data.attendance.entry(date_key.to_string()).or_default();
    document.participants = participants;
    stamp(document, now);
    document.clone()
}

/// Marks a rewritten day document: date stamp, update time, next revision.
pub fn stamp<Tz: TimeZone>(document: &mut DayDocument, now: &DateTime<Tz>)
where
    Tz::Offset: std::fmt::Display,
{
    document.date = date_stamp(now);
    document.last_updated = Some(now.with_timezone(&Utc));
    document.revision += 1;
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate, AttendanceError> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .filter(|date| date_key(*date) == key)
        .ok_or_else(|| AttendanceError::InvalidDateKey(key.to_string()))
}

/// Checks a raw participant list for a day write: nicknames are validated
/// and stored trimmed, statuses must be ones the board offers.
pub fn normalize_participants(
    variant: Variant,
    participants: Vec<Participant>,
) -> Result<Vec<Participant>, AttendanceError> {
    participants
        .into_iter()
        .map(|participant| {
            if participant.status == Status::None || !variant.offers(participant.status) {
                return Err(AttendanceError::UnsupportedStatus(participant.status));
            }
            Ok(Participant {
                nickname: validate_nickname(&participant.nickname)?,
                ..participant
            })
        })
        .collect()
}

/// Tracks which day document a subscriber should be watching.
#[derive(Debug, Clone)]
pub struct DayClock {
    current: String,
}

impl DayClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current: date_key(today),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns the new key when the local date has rolled over.
    pub fn tick(&mut self, today: NaiveDate) -> Option<&str> {
        let key = date_key(today);
        if key == self.current {
            return None;
        }
        self.current = key;
        Some(&self.current)
    }
}
