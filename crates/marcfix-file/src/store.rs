//! Shared filesystem helpers.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;

use marcfix_core::error::{Error, StoreError};

pub(crate) fn map_io(err: std::io::Error) -> Error {
    Error::Store(StoreError::Io {
        message: err.to_string(),
    })
}

pub(crate) fn map_json(err: serde_json::Error) -> Error {
    Error::Store(StoreError::Serialization {
        message: err.to_string(),
    })
}

/// An exclusive lock on a lock file, released on drop.
pub(crate) struct StoreLock {
    file: File,
}

impl StoreLock {
    /// Block until the lock at `path` is ours.
    pub(crate) fn acquire(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(map_io)?;

        FileExt::lock_exclusive(&file).map_err(map_io)?;
        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Write `value` as pretty JSON via a temp file and rename.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(map_io)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(map_json)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(map_io)?;
    fs::rename(&temp_path, path).map_err(map_io)?;
    Ok(())
}

/// Read a JSON document, or `None` if the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(map_io)?;
    serde_json::from_str(&content).map(Some).map_err(map_json)
}

/// The `.json` files directly inside `dir`, sorted by name.
pub(crate) fn json_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(map_io)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}
