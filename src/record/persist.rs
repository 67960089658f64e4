//! Build record persistence
//!
//! Reads and writes build records as pretty-printed JSON. All failures here
//! are fatal to a pipeline run: a half-written or unparseable record would
//! silently lose build history.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::model::BuildRecord;

/// Errors for record persistence and accumulation copies
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write a build record to `path`, creating parent directories as needed
pub fn save_record(record: &BuildRecord, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(record).map_err(|e| PersistError::json(path, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(path, e))?;
    }
    fs::write(path, json).map_err(|e| PersistError::io(path, e))
}

/// Read a build record from `path`
pub fn load_record(path: &Path) -> Result<BuildRecord, PersistError> {
    let contents = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| PersistError::json(path, e))
}

/// Copy `src` to `dst`, creating `dst`'s parent directories as needed
pub fn copy_into(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}
