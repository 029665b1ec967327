//! Nickname ownership across days: which device registered which nickname,
//! and moving a device's vote along when it renames itself.

use crate::attendance::{apply_status, stamp};
use crate::errors::AttendanceError;
use crate::models::{AppData, Status, UserMapping};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub nickname: String,
    pub previous_nickname: Option<String>,
    pub restored_status: Option<Status>,
    /// Day documents rewritten by the registration.
    pub touched: Vec<String>,
}

/// Every nickname that appears in any day document, lower-cased.
pub fn used_nicknames(data: &AppData) -> HashSet<String> {
    data.attendance
        .values()
        .flat_map(|document| document.participants.iter())
        .filter(|participant| !participant.nickname.is_empty())
        .map(|participant| participant.nickname.to_lowercase())
        .collect()
}

/// Status held under `nickname` on the most recent day it appears.
fn last_status(data: &AppData, nickname: &str) -> Option<Status> {
    data.attendance
        .values()
        .rev()
        .find_map(|document| {
            document
                .participants
                .iter()
                .find(|participant| participant.nickname == nickname)
        })
        .map(|participant| participant.status)
}

/// Lower-cased nicknames that other devices' mappings currently point at.
fn nicknames_held_by_others(data: &AppData, device_id: &str) -> HashSet<String> {
    data.user_mappings
        .iter()
        .filter(|(owner, _)| owner.as_str() != device_id)
        .map(|(_, mapping)| mapping.nickname.to_lowercase())
        .collect()
}

/// Drops every entry for `nickname` from every day document and restamps
/// the days that changed; returns their keys.
pub fn remove_everywhere<Tz: TimeZone>(
    data: &mut AppData,
    nickname: &str,
    now: &DateTime<Tz>,
) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    let mut touched = Vec::new();
    for (date_key, document) in data.attendance.iter_mut() {
        let before = document.participants.len();
        document
            .participants
            .retain(|participant| participant.nickname != nickname);
        if document.participants.len() != before {
            stamp(document, now);
            touched.push(date_key.clone());
        }
    }
    touched
}

/// Gives `nickname` up: its votes are withdrawn from every day and the
/// device's mapping is dropped, so the name is free for anyone.
pub fn release<Tz: TimeZone>(
    data: &mut AppData,
    device_id: &str,
    nickname: &str,
    now: &DateTime<Tz>,
) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    let owns_mapping = data
        .user_mappings
        .get(device_id)
        .is_some_and(|mapping| mapping.nickname == nickname);
    if owns_mapping {
        data.user_mappings.remove(device_id);
    }
    remove_everywhere(data, nickname, now)
}

/// Registers `nickname` (already validated) for `device_id`.
///
/// A nickname belongs to whoever voted under it on any day or whichever
/// device's mapping points at it, compared case-insensitively. A device may
/// take back the nickname its own mapping still points at, as long as no
/// other device holds it. When the device moves to a different nickname,
/// the old nickname's entries are removed from every day and its latest
/// status is replayed under the new nickname on `today_key`.
pub fn register<Tz: TimeZone>(
    data: &mut AppData,
    device_id: &str,
    nickname: &str,
    today_key: &str,
    now: &DateTime<Tz>,
) -> Result<Registration, AttendanceError>
where
    Tz::Offset: std::fmt::Display,
{
    let previous = data
        .user_mappings
        .get(device_id)
        .map(|mapping| mapping.nickname.clone());
    let previous_status = previous
        .as_deref()
        .and_then(|previous| last_status(data, previous));

    let requested = nickname.to_lowercase();
    if nicknames_held_by_others(data, device_id).contains(&requested) {
        return Err(AttendanceError::NicknameTaken(nickname.to_string()));
    }
    let reclaiming = previous
        .as_deref()
        .is_some_and(|previous| previous.to_lowercase() == requested);
    if !reclaiming && used_nicknames(data).contains(&requested) {
        return Err(AttendanceError::NicknameTaken(nickname.to_string()));
    }

    let switching = previous
        .as_deref()
        .is_some_and(|previous| previous != nickname);
    let mut touched = match previous.as_deref() {
        Some(previous) if switching => remove_everywhere(data, previous, now),
        _ => Vec::new(),
    };

    data.user_mappings.insert(
        device_id.to_string(),
        UserMapping {
            nickname: nickname.to_string(),
            updated_at: now.with_timezone(&Utc),
        },
    );

    let restored_status = previous_status.filter(|_| switching);
    if let Some(status) = restored_status {
        apply_status(data, today_key, nickname, status, now);
        if !touched.iter().any(|key| key == today_key) {
            touched.push(today_key.to_string());
        }
    }

    Ok(Registration {
        nickname: nickname.to_string(),
        previous_nickname: previous,
        restored_status,
        touched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::status_of;
    use chrono::Local;

    const YESTERDAY: &str = "2026-10-17";
    const TODAY: &str = "2026-10-18";

    fn seeded() -> AppData {
        let now = Local::now();
        let mut data = AppData::default();
        apply_status(&mut data, YESTERDAY, "Kim", Status::Join, &now);
        apply_status(&mut data, YESTERDAY, "lee", Status::Pass, &now);
        data
    }

    #[test]
    fn fresh_nickname_registers() {
        let mut data = seeded();
        let outcome = register(&mut data, "dev-a", "park", TODAY, &Local::now()).unwrap();
        assert_eq!(outcome.previous_nickname, None);
        assert_eq!(outcome.restored_status, None);
        assert!(outcome.touched.is_empty());
        assert_eq!(data.user_mappings["dev-a"].nickname, "park");
    }

    #[test]
    fn nickname_used_on_any_day_is_taken_case_insensitively() {
        let mut data = seeded();
        let err = register(&mut data, "dev-a", "KIM", TODAY, &Local::now()).unwrap_err();
        assert!(matches!(err, AttendanceError::NicknameTaken(name) if name == "KIM"));
        assert!(data.user_mappings.is_empty());
    }

    #[test]
    fn device_may_reclaim_its_own_nickname() {
        let mut data = seeded();
        data.user_mappings.insert(
            "dev-kim".into(),
            UserMapping {
                nickname: "Kim".into(),
                updated_at: Utc::now(),
            },
        );

        let outcome = register(&mut data, "dev-kim", "Kim", TODAY, &Local::now()).unwrap();
        assert_eq!(outcome.previous_nickname.as_deref(), Some("Kim"));
        assert_eq!(outcome.restored_status, None);
        assert_eq!(data.attendance[YESTERDAY].participants.len(), 2);
    }

    #[test]
    fn rename_moves_status_to_new_nickname() {
        let mut data = seeded();
        data.user_mappings.insert(
            "dev-kim".into(),
            UserMapping {
                nickname: "Kim".into(),
                updated_at: Utc::now(),
            },
        );

        let outcome = register(&mut data, "dev-kim", "striker", TODAY, &Local::now()).unwrap();

        assert_eq!(outcome.restored_status, Some(Status::Join));
        assert_eq!(outcome.touched, vec![YESTERDAY.to_string(), TODAY.to_string()]);
        assert!(!used_nicknames(&data).contains("kim"));
        assert_eq!(
            status_of(data.attendance.get(TODAY), Some("striker")),
            Status::Join
        );
        assert_eq!(data.user_mappings["dev-kim"].nickname, "striker");
    }

    #[test]
    fn latest_day_wins_when_replaying() {
        let now = Local::now();
        let mut data = AppData::default();
        apply_status(&mut data, "2026-10-16", "kim", Status::Join, &now);
        apply_status(&mut data, YESTERDAY, "kim", Status::Pass, &now);
        data.user_mappings.insert(
            "dev-kim".into(),
            UserMapping {
                nickname: "kim".into(),
                updated_at: Utc::now(),
            },
        );

        let outcome = register(&mut data, "dev-kim", "keeper", TODAY, &now).unwrap();
        assert_eq!(outcome.restored_status, Some(Status::Pass));
    }

    #[test]
    fn remove_everywhere_restamps_changed_days() {
        let mut data = seeded();
        let earlier = Local::now() - chrono::Duration::hours(2);
        apply_status(&mut data, TODAY, "lee", Status::Join, &earlier);
        let before = data.attendance[TODAY].clone();

        let now = Local::now();
        let touched = remove_everywhere(&mut data, "lee", &now);
        assert_eq!(touched, vec![YESTERDAY.to_string(), TODAY.to_string()]);

        let after = &data.attendance[TODAY];
        assert!(after.participants.is_empty());
        assert_eq!(after.revision, before.revision + 1);
        assert_eq!(after.last_updated, Some(now.with_timezone(&Utc)));
        assert!(remove_everywhere(&mut data, "lee", &now).is_empty());
    }

    #[test]
    fn released_nickname_cannot_be_reclaimed_from_its_new_owner() {
        let now = Local::now();
        let mut data = AppData::default();

        register(&mut data, "dev-a", "kim", TODAY, &now).unwrap();
        apply_status(&mut data, TODAY, "kim", Status::Join, &now);
        release(&mut data, "dev-a", "kim", &now);
        assert!(!data.user_mappings.contains_key("dev-a"));

        register(&mut data, "dev-b", "kim", TODAY, &now).unwrap();
        apply_status(&mut data, TODAY, "kim", Status::Pass, &now);

        let err = register(&mut data, "dev-a", "Kim", TODAY, &now).unwrap_err();
        assert!(matches!(err, AttendanceError::NicknameTaken(_)));

        register(&mut data, "dev-a", "ace", TODAY, &now).unwrap();
        assert_eq!(status_of(data.attendance.get(TODAY), Some("kim")), Status::Pass);
        assert_eq!(status_of(data.attendance.get(TODAY), Some("ace")), Status::None);
    }

    #[test]
    fn stale_mapping_does_not_override_another_owner() {
        let now = Local::now();
        let mut data = AppData::default();
        for device in ["dev-a", "dev-b"] {
            data.user_mappings.insert(
                device.into(),
                UserMapping {
                    nickname: "kim".into(),
                    updated_at: Utc::now(),
                },
            );
        }

        let err = register(&mut data, "dev-a", "kim", TODAY, &now).unwrap_err();
        assert!(matches!(err, AttendanceError::NicknameTaken(_)));
    }

    #[test]
    fn mapping_reserves_nickname_before_any_vote() {
        let now = Local::now();
        let mut data = AppData::default();
        register(&mut data, "dev-a", "kim", TODAY, &now).unwrap();

        let err = register(&mut data, "dev-b", "KIM", TODAY, &now).unwrap_err();
        assert!(matches!(err, AttendanceError::NicknameTaken(_)));
    }
}
