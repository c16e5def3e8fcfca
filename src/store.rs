//! Rendition blob storage
//!
//! Backends persist rendition artifacts under their textual key. Artifacts
//! are immutable: the version baked into the key changes instead of the
//! bytes, so presence of a key is the whole cache-validity check.
//!
//! The single write primitive is create-if-absent. Concurrent writers for
//! the same key carry identical bytes, so whichever lands first wins and
//! the rest report success without touching the artifact.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::link::RenditionKey;

// ============================================================================
// Blob Store Trait
// ============================================================================

/// Trait for rendition storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether an artifact exists under a key
    async fn exists(&self, key: &RenditionKey) -> Result<bool, StoreError>;

    /// Create an artifact if absent; an existing artifact is left untouched
    async fn create(&self, key: &RenditionKey, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read an artifact's bytes
    async fn read(&self, key: &RenditionKey) -> Result<Vec<u8>, StoreError>;
}

// ============================================================================
// Local Filesystem Store
// ============================================================================

/// Filesystem-backed store rooted at a base directory
///
/// The key's own text is the path relative to the base, so the on-disk
/// layout matches the links written into notes. Writes are staged to a
/// scratch sibling and linked into place, so a key either names a complete
/// artifact or nothing; a write that dies halfway can never leave a
/// truncated rendition that presence checks would treat as valid.
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn blob_path(&self, key: &RenditionKey) -> PathBuf {
        // An empty attachment root yields a leading slash in the key text;
        // strip it so the artifact stays relative to the base.
        let text = key.to_string();
        self.base_path.join(text.trim_start_matches('/'))
    }
}

/// Unique scratch sibling of a final path for staging a write
fn scratch_path(path: &Path) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let mut name = path.as_os_str().to_owned();
    name.push(format!(
        ".{}.{}.part",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    PathBuf::from(name)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn exists(&self, key: &RenditionKey) -> Result<bool, StoreError> {
        Ok(tokio::fs::try_exists(self.blob_path(key)).await?)
    }

    async fn create(&self, key: &RenditionKey, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Stage the full artifact under a scratch name, then link it into
        // place. The link is the commit point: exactly one of any
        // concurrent writers lands it, the rest see AlreadyExists, and a
        // failed write leaves the key absent rather than truncated.
        let scratch = scratch_path(&path);
        if let Err(e) = tokio::fs::write(&scratch, bytes).await {
            let _ = tokio::fs::remove_file(&scratch).await;
            return Err(StoreError::Io(e));
        }

        let publish = tokio::fs::hard_link(&scratch, &path).await;
        let _ = tokio::fs::remove_file(&scratch).await;

        match publish {
            Ok(()) => {
                tracing::debug!(key = %key, size = bytes.len(), "Stored rendition");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(key = %key, "Rendition already present, keeping first write");
                Ok(())
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn read(&self, key: &RenditionKey) -> Result<Vec<u8>, StoreError> {
        Ok(tokio::fs::read(self.blob_path(key)).await?)
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Map-backed store for tests and embedding hosts without a vault on disk
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the store holds no artifacts
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, key: &RenditionKey) -> Result<bool, StoreError> {
        Ok(self.blobs.read().await.contains_key(&key.to_string()))
    }

    async fn create(&self, key: &RenditionKey, bytes: &[u8]) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        match blobs.entry(key.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(key = %key, "Rendition already present, keeping first write");
            }
            Entry::Vacant(slot) => {
                slot.insert(bytes.to_vec());
            }
        }
        Ok(())
    }

    async fn read(&self, key: &RenditionKey) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .read()
            .await
            .get(&key.to_string())
            .cloned()
            .ok_or_else(|| StoreError::Backend(format!("no artifact under {}", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DocumentVersion;
    use tempfile::TempDir;

    fn key(root: &str, version: u64) -> RenditionKey {
        RenditionKey::new(root, "abc123", &DocumentVersion::from(version), "0").unwrap()
    }

    #[tokio::test]
    async fn test_local_create_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());
        let key = key("attachments", 5);

        assert!(!store.exists(&key).await.unwrap());
        store.create(&key, b"png bytes").await.unwrap();
        assert!(store.exists(&key).await.unwrap());
        assert_eq!(store.read(&key).await.unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn test_local_layout_follows_key_text() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());

        store.create(&key("diagrams/lucid", 5), b"x").await.unwrap();

        let expected = temp_dir
            .path()
            .join("diagrams/lucid/lucidchart~abc123~5~0.png");
        assert!(expected.exists());
    }

    #[tokio::test]
    async fn test_local_empty_root_stays_under_base() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());

        store.create(&key("", 5), b"x").await.unwrap();

        assert!(temp_dir.path().join("lucidchart~abc123~5~0.png").exists());
    }

    fn file_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_local_duplicate_create_keeps_first_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());
        let key = key("attachments", 5);

        store.create(&key, b"first").await.unwrap();
        store.create(&key, b"second").await.unwrap();

        assert_eq!(store.read(&key).await.unwrap(), b"first");
        // The losing writer cleans up its scratch file
        assert_eq!(file_count(&temp_dir.path().join("attachments")), 1);
    }

    #[tokio::test]
    async fn test_local_concurrent_create_yields_single_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());
        let key = key("attachments", 5);

        let (a, b) = tokio::join!(store.create(&key, b"bytes"), store.create(&key, b"bytes"));
        a.unwrap();
        b.unwrap();

        assert_eq!(store.read(&key).await.unwrap(), b"bytes");
        assert_eq!(file_count(&temp_dir.path().join("attachments")), 1);
    }

    #[tokio::test]
    async fn test_local_failed_create_leaves_key_absent() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the store expects its base directory makes
        // every write fail
        let bogus_base = temp_dir.path().join("not-a-directory");
        std::fs::write(&bogus_base, b"occupied").unwrap();
        let store = LocalBlobStore::new(&bogus_base);
        let key = key("attachments", 5);

        let result = store.create(&key, b"png bytes").await;

        assert!(matches!(result, Err(StoreError::Io(_))));
        // A failed create must never leave anything at the key, or later
        // presence checks would serve a damaged artifact as valid
        assert!(!bogus_base
            .join("attachments/lucidchart~abc123~5~0.png")
            .exists());
    }

    #[tokio::test]
    async fn test_memory_duplicate_create_keeps_first_write() {
        let store = MemoryBlobStore::new();
        let key = key("attachments", 5);

        store.create(&key, b"first").await.unwrap();
        store.create(&key, b"second").await.unwrap();

        assert_eq!(store.read(&key).await.unwrap(), b"first");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_versions_store_separately() {
        let store = MemoryBlobStore::new();

        store.create(&key("attachments", 5), b"old").await.unwrap();
        store.create(&key("attachments", 6), b"new").await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.read(&key("attachments", 5)).await.unwrap(), b"old");
        assert_eq!(store.read(&key("attachments", 6)).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_memory_read_missing_key_fails() {
        let store = MemoryBlobStore::new();
        let result = store.read(&key("attachments", 5)).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }
}
