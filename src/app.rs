use crate::handlers;
use crate::live;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub fn router(state: AppState, session_days: i64) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name("futsal_device")
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(session_days)));

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/me", get(handlers::me))
        .route("/api/register", post(handlers::register))
        .route("/api/nickname/release", post(handlers::release_nickname))
        .route("/api/status", post(handlers::set_status))
        .route("/api/today", get(handlers::get_today))
        .route("/api/live", get(live::live))
        .route("/api/attendance", get(handlers::get_attendance))
        .route(
            "/api/attendance/{date_key}",
            get(handlers::get_day).put(handlers::put_day),
        )
        .route("/api/mappings/{device_id}", get(handlers::get_mapping))
        .with_state(state)
        .layer(sessions)
}
