use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use directories::ProjectDirs;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    constants::{STORAGE_SETTINGS, STORE_KEY},
    domain::EventMap,
    error::Result,
};

pub fn blob_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", STORE_KEY))
}

/// Missing or unreadable blobs load as an empty calendar.
pub fn load_events(path: &Path) -> EventMap {
    if !path.exists() {
        return EventMap::new();
    }

    match read_json::<EventMap>(path) {
        Ok(map) => map
            .into_iter()
            .filter(|(_, events)| !events.is_empty())
            .collect(),
        Err(e) => {
            warn!(
                "event=store_load status=recovered path={} error={}",
                path.display(),
                e
            );
            EventMap::new()
        }
    }
}

pub fn save_events(path: &Path, events: &EventMap) -> Result<()> {
    write_json_atomic(path, events)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "datebook", "datebook")
}

pub fn get_data_dir() -> PathBuf {
    let local_blob = blob_path(Path::new("."));
    if local_blob.exists() {
        return PathBuf::from(".");
    }

    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

pub fn get_state_dir() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        if let Some(state_dir) = proj_dirs.state_dir() {
            return state_dir.to_path_buf();
        }
        return proj_dirs.data_local_dir().join("logs");
    }
    PathBuf::from("./logs")
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, &json)
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content)
}

pub fn create_backup(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let backup_dir = path.parent().unwrap_or(Path::new(".")).join("backups");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S%3f");
    let filename = format!(
        "{}.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        timestamp
    );
    fs::copy(path, backup_dir.join(&filename))?;

    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    if let Ok(entries) = fs::read_dir(&backup_dir) {
        let mut backups: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&*stem))
            .collect();
        backups.sort_by_key(|e| e.file_name());

        let excess = backups.len().saturating_sub(STORAGE_SETTINGS.max_backups);
        for oldest in backups.iter().take(excess) {
            let _ = fs::remove_file(oldest.path());
        }
    }

    Ok(())
}

pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if path.exists() {
        create_backup(path)?;
    }

    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(content.as_bytes())?;
    tmp_file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
