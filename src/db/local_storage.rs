use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::error::{AppError, AppResult};

/// Device-local key/value storage
///
/// Every key maps to one file under the storage directory holding the raw string value.
/// Reads and writes are whole-value; there is no partial update.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Opens storage rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Local storage opened");
        Ok(Self { dir })
    }

    /// Returns the value stored under `key`, or `None` if the key was never set
    pub fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the value stored under `key`
    pub fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        // each write gets its own temp file, renamed over the entry when complete
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::LocalStorage(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}
