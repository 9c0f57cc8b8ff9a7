use crate::error::DatasetError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File-name shape of an exported analysis dataset.
const DATASET_PREFIX: &str = "analysis_dataset_";
const DATASET_EXTENSION: &str = "csv";

/// Finds the most recent `analysis_dataset_*.csv` in the reports directory.
///
/// "Most recent" is by modification time, the portable stand-in for file
/// creation time. Returns `DatasetError::NotFound` when the directory has no
/// matching file (or does not exist at all).
pub fn find_latest_dataset(reports_dir: &Path) -> Result<PathBuf, DatasetError> {
    let entries = match fs::read_dir(reports_dir) {
        Ok(entries) => entries,
        Err(_) => return Err(DatasetError::NotFound(reports_dir.to_path_buf())),
    };

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !is_dataset_file(&path) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        let newer = match &latest {
            Some((best, _)) => modified > *best,
            None => true,
        };
        if newer {
            latest = Some((modified, path));
        }
    }

    latest
        .map(|(_, path)| path)
        .ok_or_else(|| DatasetError::NotFound(reports_dir.to_path_buf()))
}

fn is_dataset_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.extension().and_then(|e| e.to_str()) == Some(DATASET_EXTENSION)
        && name.starts_with(DATASET_PREFIX)
}
