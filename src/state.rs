use crate::config::AppConfig;
use crate::errors::AttendanceError;
use crate::models::{AppData, DayChange, Weather};
use crate::storage::persist_data;
use crate::variant::Variant;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub variant: Variant,
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub events: broadcast::Sender<DayChange>,
    /// Placeholder; nothing feeds live weather yet.
    pub weather: Weather,
}

impl AppState {
    pub fn new(config: &AppConfig, data: AppData) -> Self {
        Self {
            variant: config.variant,
            data_path: config.data_path.clone(),
            data: Arc::new(Mutex::new(data)),
            events: broadcast::channel(EVENT_CAPACITY).0,
            weather: Weather::default(),
        }
    }

    /// Runs a read-modify-write over the whole document tree under the store
    /// lock. The mutation works on a copy; the copy is persisted before it
    /// replaces the live tree, and only then are the touched day documents
    /// announced to subscribers.
    pub async fn commit<T, F>(&self, mutate: F) -> Result<T, AttendanceError>
    where
        F: FnOnce(&mut AppData) -> Result<(T, Vec<String>), AttendanceError>,
    {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let (output, touched) = mutate(&mut next)?;
        if touched.is_empty() && next.user_mappings == data.user_mappings {
            return Ok(output);
        }

        persist_data(&self.data_path, &next).await?;
        *data = next;

        for date_key in touched {
            let document = data.attendance.get(&date_key).cloned().unwrap_or_default();
            // No receivers just means nobody is watching right now.
            if self.events.send(DayChange { date_key, document }).is_err() {
                debug!("day change with no live subscribers");
            }
        }

        Ok(output)
    }
}
