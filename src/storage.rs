use crate::errors::AttendanceError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

/// Writes to a sibling temp file and renames it over the target, so a crash
/// mid-write never leaves a truncated document tree behind.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AttendanceError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayDocument, Participant, Status};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("futsal_rsvp_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty_tree() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.attendance.is_empty());
        assert!(data.user_mappings.is_empty());
    }

    #[tokio::test]
    async fn persisted_tree_loads_back() {
        let path = temp_path("persist");
        let mut data = AppData::default();
        data.attendance.insert(
            "2026-10-18".into(),
            DayDocument {
                participants: vec![Participant {
                    nickname: "kim".into(),
                    status: Status::Join,
                    time: "11:42".into(),
                }],
                date: "Sun Oct 18 2026".into(),
                last_updated: None,
                revision: 3,
            },
        );

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        let _ = std::fs::remove_file(&path);

        let day = loaded.attendance.get("2026-10-18").expect("missing day");
        assert_eq!(day.revision, 3);
        assert_eq!(day.participants[0].nickname, "kim");
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{ not json").unwrap();
        let data = load_data(&path).await;
        let _ = std::fs::remove_file(&path);
        assert!(data.attendance.is_empty());
    }
}
