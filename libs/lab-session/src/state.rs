//! Persistence port
//!
//! Favorites and lesson progress are saved through [`StateStore`], a small
//! key-value interface, instead of touching any storage directly. Values are
//! opaque bytes; the typed helpers [`load_json`] and [`save_json`] cover the
//! common case of a serde struct stored as JSON text.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::{Result, SessionError};

/// Key under which lab favorites are saved
pub const FAVORITES_KEY: &str = "lab:favorites";

/// Key-value persistence port
pub trait StateStore: Send + Sync {
    /// Get the value for a key
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Set the value for a key
    fn set(&self, key: &str, value: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Delete a key; deleting a missing key is not an error
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

impl<S: StateStore> StateStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> impl Future<Output = Result<()>> + Send {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).delete(key)
    }
}

/// Read and deserialize a JSON value
pub async fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: StateStore,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value
pub async fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: StateStore,
    T: Serialize + Sync,
{
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes).await
}

/// Key for one lesson's progress record
///
/// Format: `lesson:progress:{lesson_id}`
pub fn progress_key(lesson_id: &str) -> String {
    format!("lesson:progress:{}", lesson_id)
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory state store for tests and one-shot sessions
#[derive(Default)]
pub struct MemoryStateStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send {
        let key = key.to_string();
        async move {
            let data = self.data.read().await;
            Ok(data.get(&key).cloned())
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> impl Future<Output = Result<()>> + Send {
        let key = key.to_string();
        let value = value.to_vec();
        async move {
            let mut data = self.data.write().await;
            data.insert(key, value);
            Ok(())
        }
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let key = key.to_string();
        async move {
            let mut data = self.data.write().await;
            data.remove(&key);
            Ok(())
        }
    }
}

/// Store that keeps nothing; every read misses
pub struct NullStateStore;

impl StateStore for NullStateStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Store backed by a single JSON object file
///
/// The file maps keys to UTF-8 string values. Every write rewrites the whole
/// file through a sibling temp file and a rename, so a crash leaves either
/// the old or the new contents. A missing file reads as empty.
pub struct JsonFileStateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type FileContents = BTreeMap<String, String>;

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    async fn read_all(&self) -> Result<FileContents> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(FileContents::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileContents::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, contents: &FileContents) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(contents)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), keys = contents.len(), "state file written");
        Ok(())
    }
}

impl StateStore for JsonFileStateStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let _guard = self.lock.lock().await;
        let contents = self.read_all().await?;
        Ok(contents.get(key).map(|v| v.clone().into_bytes()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| SessionError::store(format!("Value for '{}' is not UTF-8: {}", key, e)))?;
        let _guard = self.lock.lock().await;
        let mut contents = self.read_all().await?;
        contents.insert(key.to_string(), text.to_string());
        self.write_all(&contents).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut contents = self.read_all().await?;
        if contents.remove(key).is_some() {
            self.write_all(&contents).await?;
        }
        Ok(())
    }
}
