use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handle to the in-memory event log and the snapshot file behind it.
#[derive(Clone)]
pub struct AppState {
    pub log_path: PathBuf,
    pub log: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(log_path: PathBuf, log: AppData) -> Self {
        Self {
            log_path,
            log: Arc::new(Mutex::new(log)),
        }
    }
}
