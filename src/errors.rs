use axum::http::StatusCode;
use thiserror::Error;

/// Nickname validation failures, reported inline and recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("nickname is required")]
    Empty,
    #[error("nickname must be at most {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error(transparent)]
    InvalidNickname(#[from] NicknameError),

    #[error("nickname '{0}' is already in use")]
    NicknameTaken(String),

    #[error("register a nickname first")]
    NotRegistered,

    #[error("status '{0}' is not offered on this board")]
    UnsupportedStatus(crate::models::Status),

    #[error("'{0}' is not a YYYY-MM-DD date key")]
    InvalidDateKey(String),

    #[error("day document {date_key} is at revision {actual}, expected {expected}")]
    RevisionConflict {
        date_key: String,
        expected: u64,
        actual: u64,
    },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        let status = match &err {
            AttendanceError::InvalidNickname(_)
            | AttendanceError::UnsupportedStatus(_)
            | AttendanceError::InvalidDateKey(_) => StatusCode::BAD_REQUEST,
            AttendanceError::NicknameTaken(_) | AttendanceError::RevisionConflict { .. } => {
                StatusCode::CONFLICT
            }
            AttendanceError::NotRegistered => StatusCode::UNAUTHORIZED,
            AttendanceError::Storage(_)
            | AttendanceError::Serialization(_)
            | AttendanceError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
