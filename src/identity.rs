//! Per-device identity: a generated device identifier plus the nickname the
//! device last registered, both kept in the device's cookie session.

use crate::errors::{AttendanceError, NicknameError};
use chrono::Utc;
use rand::Rng;
use tower_sessions::Session;
use tracing::info;

pub const DEVICE_ID_KEY: &str = "futsalUserId";
pub const NICKNAME_KEY: &str = "futsalNickname";
pub const MAX_NICKNAME_CHARS: usize = 10;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub device_id: String,
    pub nickname: Option<String>,
}

impl Identity {
    pub async fn load(session: &Session) -> Result<Self, AttendanceError> {
        let device_id = get_or_create_device_id(session).await?;
        let nickname = stored_nickname(session).await?;
        Ok(Self {
            device_id,
            nickname,
        })
    }

    pub fn require_nickname(&self) -> Result<&str, AttendanceError> {
        self.nickname.as_deref().ok_or(AttendanceError::NotRegistered)
    }
}

pub async fn get_or_create_device_id(session: &Session) -> Result<String, AttendanceError> {
    if let Some(device_id) = session.get::<String>(DEVICE_ID_KEY).await? {
        return Ok(device_id);
    }

    let device_id = generate_device_id(Utc::now().timestamp_millis(), &mut rand::rng());
    session.insert(DEVICE_ID_KEY, &device_id).await?;
    info!(%device_id, "issued new device id");
    Ok(device_id)
}

/// `user_{millis}_{9 base-36 chars}`; uniqueness rests on the random suffix.
pub fn generate_device_id(epoch_millis: i64, rng: &mut impl Rng) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("user_{epoch_millis}_{suffix}")
}

pub fn validate_nickname(input: &str) -> Result<String, NicknameError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NicknameError::Empty);
    }
    if trimmed.chars().count() > MAX_NICKNAME_CHARS {
        return Err(NicknameError::TooLong {
            max: MAX_NICKNAME_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

pub async fn stored_nickname(session: &Session) -> Result<Option<String>, AttendanceError> {
    Ok(session.get::<String>(NICKNAME_KEY).await?)
}

pub async fn store_nickname(session: &Session, nickname: &str) -> Result<(), AttendanceError> {
    session.insert(NICKNAME_KEY, nickname).await?;
    Ok(())
}

pub async fn clear_nickname(session: &Session) -> Result<(), AttendanceError> {
    session.remove::<String>(NICKNAME_KEY).await?;
    Ok(())
}
