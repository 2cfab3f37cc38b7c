//! Filesystem-backed storage: one file per key under a configured directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::{StoragePort, StoreError};

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Maps a key to its backing file. Keys may contain whitespace, slashes,
    /// or non-ASCII text, so every non-alphanumeric byte is percent-encoded
    /// to keep the file name flat and portable.
    fn path_for(&self, key: &str) -> PathBuf {
        let encoded = utf8_percent_encode(key, NON_ALPHANUMERIC).to_string();
        self.root.join(encoded)
    }
}

impl StoragePort for FsStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsStore::open(dir.path()).expect("store should open");
        (dir, store)
    }

    #[test]
    fn read_missing_key_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.read("absent").unwrap(), None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = store();
        store.write("reddit_insight_iphone battery", "{\"a\":1}").unwrap();
        assert_eq!(
            store.read("reddit_insight_iphone battery").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn write_overwrites_prior_value() {
        let (_dir, store) = store();
        store.write("k", "old").unwrap();
        store.write("k", "new").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn delete_removes_entry_and_tolerates_missing() {
        let (_dir, store) = store();
        store.write("k", "v").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
        store.delete("k").expect("deleting a missing key is fine");
    }

    #[test]
    fn keys_with_path_separators_stay_inside_root() {
        let (dir, store) = store();
        store.write("../escape/attempt", "v").unwrap();
        assert_eq!(store.read("../escape/attempt").unwrap().as_deref(), Some("v"));
        // The encoded file lives directly under the root.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn non_ascii_keys_round_trip() {
        let (_dir, store) = store();
        store.write("reddit_insight_婴儿睡眠", "v").unwrap();
        assert_eq!(store.read("reddit_insight_婴儿睡眠").unwrap().as_deref(), Some("v"));
    }
}
