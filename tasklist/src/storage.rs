//! File-backed key/value store.
//!
//! Each slot lives in its own file, `<dir>/<key>.json`. Writes go to a
//! temporary file that is synced and then renamed over the slot, so a slot is
//! either the old value or the new one, never a torn mix.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use tasklist_core::environment::{KeyValueStore, StorageError};

/// Durable key/value store rooted at a directory
///
/// The directory is created on the first write; reading from a directory
/// that does not exist yet simply finds no slots.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir` (nothing touches the disk yet)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn write_atomically(&self, path: &Path, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let temp = self.dir.join(format!(".{key}.json.tmp"));
        let file = fs::File::create(&temp)?;
        replace_with(file, &temp, path, value).inspect_err(|_| {
            // Best effort: do not leave the temp file behind
            let _ = fs::remove_file(&temp);
        })
    }
}

fn replace_with(mut file: fs::File, temp: &Path, path: &Path, value: &str) -> io::Result<()> {
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        self.write_atomically(&path, key, value)
            .map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })?;
        tracing::trace!(path = %path.display(), "Slot file replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_reads_as_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path().join("not-created-yet"));
        assert!(matches!(store.get("todos"), Ok(None)));
    }

    #[test]
    fn set_creates_directory_and_slot_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("data");
        let store = FileStore::new(&dir);
        assert_eq!(store.dir(), dir.as_path());

        store.set("todos", "[]").unwrap();

        assert_eq!(fs::read_to_string(dir.join("todos.json")).unwrap(), "[]");
        assert!(!dir.join(".todos.json.tmp").exists());
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn set_replaces_previous_value() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());

        store.set("filter", "\"all\"").unwrap();
        store.set("filter", "\"done\"").unwrap();

        assert_eq!(store.get("filter").unwrap().as_deref(), Some("\"done\""));
    }

    #[test]
    fn slots_are_independent() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());

        store.set("todos", "[1]").unwrap();
        store.set("filter", "\"active\"").unwrap();

        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("filter").unwrap().as_deref(), Some("\"active\""));
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());

        for key in ["", "../todos", "a/b", "todos.json"] {
            assert!(matches!(store.get(key), Err(StorageError::InvalidKey(_))), "{key}");
            assert!(matches!(store.set(key, "[]"), Err(StorageError::InvalidKey(_))), "{key}");
        }
    }

    #[test]
    fn unwritable_location_reports_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let store = FileStore::new(blocker.join("data"));
        assert!(matches!(
            store.set("todos", "[]"),
            Err(StorageError::Io { ref key, .. }) if key == "todos"
        ));
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());
        // A non-empty directory cannot be renamed over
        fs::create_dir_all(temp.path().join("todos.json").join("inner")).unwrap();

        assert!(matches!(
            store.set("todos", "[]"),
            Err(StorageError::Io { ref key, .. }) if key == "todos"
        ));
        assert!(!temp.path().join(".todos.json.tmp").exists());
        assert!(temp.path().join("todos.json").is_dir());
    }
}
