//! Directory-backed storage: one JSON file per key.
//!
//! Writes go to a temp file in the same directory, are fsynced, then renamed
//! over the target so a reader never sees a half-written record.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::StateStorage;
use crate::error::PersistenceError;

/// Stores each key as `<dir>/<sanitized key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for state files. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The state directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_`, so
    /// `yasira:cart-storage` lands in `yasira_cart-storage.json`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl StateStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.path_for(key);
        let temp_path = final_path.with_extension(format!("json.tmp.{}", std::process::id()));

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;
        debug!(path = %final_path.display(), bytes = value.len(), "Wrote state file");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_path_sanitizes_key() {
        let storage = FileStorage::new("/state");
        assert_eq!(
            storage.path_for("yasira:cart-storage"),
            PathBuf::from("/state/yasira_cart-storage.json")
        );
        assert_eq!(
            storage.path_for("../escape"),
            PathBuf::from("/state/.._escape.json")
        );
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path().join("nested"));

        storage.write("ns:key", "{\"a\":1}").unwrap();
        assert_eq!(storage.read("ns:key").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.write("ns:key", "{}").unwrap();
        assert_eq!(storage.read("ns:key").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path());
        storage.write("ns:key", "{}").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["ns_key.json"]);
    }

    #[test]
    fn test_missing_key_reads_none() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path());
        assert!(storage.read("absent").unwrap().is_none());
        assert!(storage.remove("absent").is_ok());
    }

    #[test]
    fn test_remove_deletes_file() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path());
        storage.write("k", "{}").unwrap();
        storage.remove("k").unwrap();
        assert!(!storage.path_for("k").exists());
    }
}
