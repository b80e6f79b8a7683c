use crate::storage::KeyValueStore;
use crate::{fs, Result};
use std::path::{Path, PathBuf};

/// A `KeyValueStore` that keeps each key in its own file inside a directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store at `dir`, creating the directory if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        fs::read_optional(self.path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write_atomic(self.path(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        fs::remove_optional(self.path(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{TRANSACTIONS, USER_NAME};
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("storage")).unwrap();
        assert!(store.dir().is_dir());
        assert_eq!(store.get(USER_NAME).unwrap(), None);

        store.set(USER_NAME, "Sari").unwrap();
        assert_eq!(store.get(USER_NAME).unwrap().as_deref(), Some("Sari"));

        // A second handle on the same directory sees the value.
        let reopened = FileStore::open(store.dir()).unwrap();
        assert_eq!(reopened.get(USER_NAME).unwrap().as_deref(), Some("Sari"));

        store.remove(USER_NAME).unwrap();
        assert_eq!(store.get(USER_NAME).unwrap(), None);
        store.remove(TRANSACTIONS).unwrap();
    }
}
