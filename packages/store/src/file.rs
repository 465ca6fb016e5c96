//! File-backed repository: one pretty-printed JSON file per key.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{Repository, StoreError};

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Repository storing each key as `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    /// Creates a repository rooted at `data_dir`. The directory is created
    /// on first write.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory of the repository.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

impl Repository for FileRepository {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        match std::fs::read_to_string(self.path(key)?) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<bool, StoreError> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
        log::debug!("Wrote {}", path.display());
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        match std::fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
