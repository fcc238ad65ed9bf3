use crate::errors::AppError;
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("TRACKER_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/tracker.json"))
}

/// A missing or unreadable snapshot falls back to an empty log so a fresh
/// install starts clean instead of refusing to boot.
pub async fn load_data(path: &Path) -> AppData {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AppData::default(),
        Err(err) => {
            error!("failed to read tracker file: {err}");
            return AppData::default();
        }
    };

    match serde_json::from_slice::<AppData>(&bytes) {
        Ok(data) => {
            info!(
                "loaded {} events and {} accidents",
                data.events.len(),
                data.accidents.len()
            );
            data
        }
        Err(err) => {
            error!("failed to parse tracker file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
