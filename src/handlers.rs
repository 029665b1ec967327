use crate::attendance::{
    apply_status, date_key, normalize_participants, parse_date_key, replace_day_if,
};
use crate::errors::{AppError, AttendanceError};
use crate::identity::{
    clear_nickname, get_or_create_device_id, store_nickname, validate_nickname, Identity,
};
use crate::models::{
    Board, DayDocument, IdentityResponse, PutDayRequest, RegisterRequest, RegisterResponse,
    StatusRequest, UserMapping,
};
use crate::presentation::build_board_at;
use crate::registry::{register as register_nickname, release, Registration};
use crate::state::AppState;
use crate::ui::render_index;
use crate::variant::Variant;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::Local;
use std::collections::BTreeMap;
use tower_sessions::Session;
use tracing::{error, info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.variant))
}

pub async fn me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<IdentityResponse>, AppError> {
    let identity = Identity::load(&session)
        .await
        .map_err(|err| state.variant.reject(err))?;
    Ok(Json(IdentityResponse {
        registered: identity.nickname.is_some(),
        device_id: identity.device_id,
        nickname: identity.nickname,
    }))
}

pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let variant = state.variant;
    let nickname = validate_nickname(&payload.nickname)
        .map_err(|err| variant.reject(err.into()))?;
    let device_id = get_or_create_device_id(&session)
        .await
        .map_err(|err| fail(variant, err, variant.copy().nickname_check_failed))?;

    let registration = if variant.enforces_unique_nicknames() {
        let now = Local::now();
        let today = date_key(now.date_naive());
        state
            .commit(|data| {
                let registration = register_nickname(data, &device_id, &nickname, &today, &now)?;
                let touched = registration.touched.clone();
                Ok((registration, touched))
            })
            .await
            .map_err(|err| fail(variant, err, variant.copy().nickname_check_failed))?
    } else {
        Registration {
            nickname,
            previous_nickname: None,
            restored_status: None,
            touched: Vec::new(),
        }
    };

    store_nickname(&session, &registration.nickname)
        .await
        .map_err(|err| fail(variant, err, variant.copy().nickname_check_failed))?;

    info!(
        %device_id,
        nickname = %registration.nickname,
        previous = ?registration.previous_nickname,
        restored = ?registration.restored_status,
        "nickname registered"
    );

    Ok(Json(RegisterResponse {
        device_id,
        nickname: registration.nickname,
        previous_nickname: registration.previous_nickname,
        restored_status: registration.restored_status,
    }))
}

/// "Change nickname": forgets the session nickname so the device can pick a
/// new one. Boards that own nicknames also withdraw every vote cast under it
/// and drop the device's mapping.
pub async fn release_nickname(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<IdentityResponse>, AppError> {
    let variant = state.variant;
    let identity = Identity::load(&session)
        .await
        .map_err(|err| variant.reject(err))?;

    let owned = identity
        .nickname
        .as_deref()
        .filter(|_| variant.enforces_unique_nicknames());
    if let Some(nickname) = owned {
        let now = Local::now();
        let removed = state
            .commit(|data| {
                let touched = release(data, &identity.device_id, nickname, &now);
                Ok((touched.len(), touched))
            })
            .await;
        match removed {
            Ok(days) => info!(nickname, days, "withdrew votes for released nickname"),
            Err(err) => error!(nickname, "failed to withdraw votes: {err}"),
        }
    }

    clear_nickname(&session)
        .await
        .map_err(|err| variant.reject(err))?;

    Ok(Json(IdentityResponse {
        device_id: identity.device_id,
        nickname: None,
        registered: false,
    }))
}

pub async fn set_status(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<Board>, AppError> {
    let variant = state.variant;
    let status = payload.status;
    if !variant.offers(status) {
        return Err(variant.reject(AttendanceError::UnsupportedStatus(status)));
    }

    let identity = Identity::load(&session)
        .await
        .map_err(|err| variant.reject(err))?;
    let nickname = identity
        .require_nickname()
        .map_err(|err| variant.reject(err))?
        .to_string();

    let now = Local::now();
    let key = date_key(now.date_naive());
    let document = state
        .commit(|data| {
            let document = apply_status(data, &key, &nickname, status, &now);
            Ok((document, vec![key.clone()]))
        })
        .await
        .map_err(|err| fail(variant, err, variant.copy().status_update_failed))?;

    info!(%nickname, %status, date_key = %key, "status updated");

    Ok(Json(build_board_at(
        variant,
        &key,
        Some(&document),
        Some(&nickname),
        now.naive_local(),
        state.weather,
    )))
}

pub async fn get_today(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Board>, AppError> {
    let nickname = Identity::load(&session)
        .await
        .map_err(|err| state.variant.reject(err))?
        .nickname;
    let now = Local::now();
    let key = date_key(now.date_naive());
    let data = state.data.lock().await;

    Ok(Json(build_board_at(
        state.variant,
        &key,
        data.attendance.get(&key),
        nickname.as_deref(),
        now.naive_local(),
        state.weather,
    )))
}

pub async fn get_attendance(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, DayDocument>> {
    let data = state.data.lock().await;
    Json(data.attendance.clone())
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date_key): Path<String>,
) -> Result<Json<DayDocument>, AppError> {
    let data = state.data.lock().await;
    data.attendance
        .get(&date_key)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no attendance for {date_key}")))
}

pub async fn put_day(
    State(state): State<AppState>,
    Path(date_key): Path<String>,
    Json(payload): Json<PutDayRequest>,
) -> Result<Json<DayDocument>, AppError> {
    parse_date_key(&date_key).map_err(|err| state.variant.reject(err))?;
    let participants = normalize_participants(state.variant, payload.participants)
        .map_err(|err| state.variant.reject(err))?;

    let now = Local::now();
    let document = state
        .commit(|data| {
            let document = replace_day_if(
                data,
                &date_key,
                participants,
                payload.expected_revision,
                &now,
            )?;
            Ok((document, vec![date_key.clone()]))
        })
        .await
        .map_err(|err| {
            warn!(%date_key, "conditional day write rejected: {err}");
            state.variant.reject(err)
        })?;

    Ok(Json(document))
}

pub async fn get_mapping(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<UserMapping>, AppError> {
    let data = state.data.lock().await;
    data.user_mappings
        .get(&device_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no mapping for {device_id}")))
}

/// Infrastructure failures are logged and surfaced with the board's generic
/// retry message; anything the user can fix keeps its own wording.
fn fail(variant: Variant, err: AttendanceError, fallback: &str) -> AppError {
    match err {
        AttendanceError::Storage(_)
        | AttendanceError::Serialization(_)
        | AttendanceError::Session(_) => {
            error!("request failed: {err}");
            AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: fallback.to_string(),
            }
        }
        other => variant.reject(other),
    }
}
