//! File-backed key-value store.
//!
//! Each key maps to one file inside the store directory. Writes land in a
//! sibling temporary file first and are renamed over the target, so a crash
//! mid-write leaves the previous snapshot readable. Temporary names are unique
//! per process and per write, so concurrent writers (including other `gm-cart`
//! processes) never share one.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;

use super::KeyValueStore;
use crate::error::StorageError;

const VALUE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// Sequence number for temporary file names within this process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Key-value store that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let stem = encode_key(key)?;
        Ok(self.dir.join(format!("{stem}.{VALUE_EXTENSION}")))
    }
}

/// Unique temporary sibling of `path`: `<name>.<pid>.<seq>.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{seq}.{TEMP_SUFFIX}", std::process::id()));
    path.with_file_name(name)
}

/// Map a key to a file stem that is safe on every platform.
///
/// ASCII alphanumerics, `-`, `_` and `.` pass through; every other byte is
/// written as `%XX`.
fn encode_key(key: &str) -> Result<String, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }

    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
            encoded.push(char::from(byte));
        } else {
            // Writing to a String cannot fail
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    Ok(encoded)
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = temp_path_for(&path);

        fs::create_dir_all(&self.dir).await?;
        let written = match fs::write(&tmp, value).await {
            Ok(()) => fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::trace!(path = %path.display(), bytes = value.len(), "Wrote value file");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_escapes_separators() {
        assert_eq!(
            encode_key("@GoMarketplace:products").unwrap(),
            "%40GoMarketplace%3Aproducts"
        );
        assert_eq!(encode_key("plain-key_1.v2").unwrap(), "plain-key_1.v2");
        assert_eq!(encode_key("a/b").unwrap(), "a%2Fb");
    }

    #[test]
    fn test_encode_key_rejects_empty() {
        assert!(matches!(encode_key(""), Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("@app:cart", "[1]").await.unwrap();
        store.set("@app:cart", "[2]").await.unwrap();

        assert_eq!(store.get("@app:cart").await.unwrap().as_deref(), Some("[2]"));
        assert!(store.path_for("@app:cart").unwrap().exists());
        assert_eq!(leftover_temp_files(store.dir()), 0);
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|entry| {
                entry
                    .as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(TEMP_SUFFIX)
            })
            .count()
    }

    #[test]
    fn test_temp_paths_are_unique_siblings() {
        let target = Path::new("/data/cart.json");
        let first = temp_path_for(target);
        let second = temp_path_for(target);

        assert_ne!(first, second);
        assert_eq!(first.parent(), target.parent());
        assert!(
            first
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("cart.json.")
        );
    }

    #[tokio::test]
    async fn test_concurrent_writers_never_tear_value() {
        let dir = tempfile::tempdir().unwrap();
        let values: Vec<String> = (0..8)
            .map(|n| format!("[{}]", "9".repeat(n * 512 + 1)))
            .collect();

        let mut handles = Vec::new();
        for value in values.clone() {
            // Separate instances, as separate processes would have
            let store = FileStore::new(dir.path());
            handles.push(tokio::spawn(async move {
                store.set("@app:cart", &value).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = FileStore::new(dir.path())
            .get("@app:cart")
            .await
            .unwrap()
            .unwrap();
        assert!(values.contains(&stored));
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_values_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set("k", "v").await.unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", "v").await.unwrap();

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
