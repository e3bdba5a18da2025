use std::path::PathBuf;

use crate::{logging, storage};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Settings {
    /// Explicit values win over the platform directories.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        let log_dir = match &data_dir {
            Some(dir) => dir.join("logs"),
            None => storage::get_state_dir(),
        };
        Self {
            data_dir: data_dir.unwrap_or_else(storage::get_data_dir),
            log_dir,
            log_level: log_level.unwrap_or_else(|| logging::default_log_level().to_string()),
        }
    }

    pub fn blob_path(&self) -> PathBuf {
        storage::blob_path(&self.data_dir)
    }
}
