use crate::variant::Variant;
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub variant: Variant,
    /// How long an idle device keeps its identity cookie.
    pub session_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let variant = match env::var("APP_VARIANT") {
            Ok(value) => value.parse().unwrap_or_else(|err| {
                warn!("{err}, falling back to the Korean board");
                Variant::Korean
            }),
            Err(_) => Variant::Korean,
        };

        let session_days = env::var("APP_SESSION_DAYS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_SESSION_DAYS);

        Self {
            port,
            data_path: resolve_data_path(),
            variant,
            session_days,
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}
