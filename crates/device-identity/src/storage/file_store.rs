//! Filesystem-backed durable store — one JSON file per namespace.
//!
//! File format:
//! ```json
//! {
//!     "version": 1,
//!     "entries": { "<key>": "<value>" }
//! }
//! ```
//!
//! Writes go to a sibling temp file, are fsynced, and renamed into place, so
//! `put` is durable before it returns and a reader never sees a partial file.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DurableStore;

// ── File format constants ─────────────────────────────────────────────────────

const STORE_FILE_VERSION: u32 = 1;

// ── On-disk structure ─────────────────────────────────────────────────────────

/// Top-level structure written to disk for each namespace.
#[derive(Debug, Serialize, Deserialize)]
struct NamespaceFile {
    /// Format version number.
    version: u32,
    /// The stored key/value pairs.
    entries: BTreeMap<String, String>,
}

impl NamespaceFile {
    fn empty() -> Self {
        Self {
            version: STORE_FILE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// Filesystem-backed [`DurableStore`].
///
/// Safe for single-process use; concurrent writers from multiple processes
/// are not coordinated.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new `FileStore` rooted at `base_dir`.
    ///
    /// The directory and any missing parents are created if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory cannot be created.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.base_dir.join(format!("{namespace}.json"))
    }

    fn read_namespace(&self, namespace: &str) -> Result<NamespaceFile> {
        validate_name(namespace)?;
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(NamespaceFile::empty());
        }
        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidFileFormat(format!("namespace {namespace}: {e}")))
    }
}

impl DurableStore for FileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let file = self.read_namespace(namespace)?;
        Ok(file.entries.get(key).cloned())
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut file = self.read_namespace(namespace)?;
        file.entries.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::SerializationError(e.to_string()))?;

        write_durable(&self.namespace_path(namespace), json.as_bytes())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Namespaces name files on disk; restrict them to a filename-safe charset.
fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !ok {
        return Err(Error::Storage(format!("invalid namespace: {name:?}")));
    }
    Ok(())
}

/// Write `data` to `path` atomically and durably.
///
/// The store contract requires the value to be on disk before `put` returns,
/// so the temp file is fsynced before the rename.
fn write_durable(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");

    let mut file = std::fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_get_missing_is_none() {
        let (_dir, store) = make_store();
        assert_eq!(store.get("device_info", "encrypted_uuid").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let (_dir, store) = make_store();
        store.put("device_info", "encrypted_uuid", "blob").unwrap();
        assert_eq!(
            store.get("device_info", "encrypted_uuid").unwrap().as_deref(),
            Some("blob")
        );
    }

    #[test]
    fn test_put_replaces_value() {
        let (_dir, store) = make_store();
        store.put("ns", "k", "old").unwrap();
        store.put("ns", "k", "new").unwrap();
        assert_eq!(store.get("ns", "k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let (_dir, store) = make_store();
        store.put("ns-a", "k", "a").unwrap();
        store.put("ns-b", "k", "b").unwrap();
        assert_eq!(store.get("ns-a", "k").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("ns-b", "k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("store");

        let store = FileStore::new(&store_dir).unwrap();
        store.put("ns", "k", "persisted").unwrap();
        drop(store);

        let reopened = FileStore::new(&store_dir).unwrap();
        assert_eq!(reopened.get("ns", "k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_corrupted_namespace_file() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("store");
        let store = FileStore::new(&store_dir).unwrap();

        std::fs::write(store_dir.join("bad.json"), b"{{{{").unwrap();
        assert!(matches!(
            store.get("bad", "k"),
            Err(Error::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let (_dir, store) = make_store();
        assert!(store.get("../escape", "k").is_err());
        assert!(store.put("", "k", "v").is_err());
    }
}
