//! Persisted client state.
//!
//! A small async key-value store holds the only state that outlives a
//! portal instance: the project configuration, the login flag with its
//! username, and the display settings. [`PersistentState`] gives typed
//! access to those keys on top of any [`KeyValueStore`].

use crate::error::{PortalError, Result};
use crate::settings::DisplaySettings;
use crate::setup::ProjectConfigRecord;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const PROJECT_CONFIG_KEY: &str = "projectConfig";
pub const AUTH_KEY: &str = "isAuthenticated";
pub const USERNAME_KEY: &str = "username";
pub const DISPLAY_SETTINGS_KEY: &str = "displaySettings";

/// String key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a data directory
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Opens the store, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            PortalError::Storage(format!("cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(PortalError::InvalidInput(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(key, path = %path.display(), "State written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Typed accessors for the persisted keys
#[derive(Clone)]
pub struct PersistentState {
    store: Arc<dyn KeyValueStore>,
}

impl PersistentState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// State backed by a [`MemoryKvStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKvStore::new()))
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }

    pub async fn project_config(&self) -> Result<Option<ProjectConfigRecord>> {
        self.get_json(PROJECT_CONFIG_KEY).await
    }

    pub async fn save_project_config(&self, config: &ProjectConfigRecord) -> Result<()> {
        self.set_json(PROJECT_CONFIG_KEY, config).await
    }

    pub async fn clear_project_config(&self) -> Result<()> {
        self.store.remove(PROJECT_CONFIG_KEY).await
    }

    /// True only when the flag holds exactly "true"
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.get(AUTH_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn username(&self) -> Result<Option<String>> {
        self.store.get(USERNAME_KEY).await
    }

    pub async fn save_session(&self, username: &str) -> Result<()> {
        self.store.set(AUTH_KEY, "true").await?;
        self.store.set(USERNAME_KEY, username).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.store.remove(AUTH_KEY).await?;
        self.store.remove(USERNAME_KEY).await
    }

    /// Stored settings, or defaults when absent or unreadable
    pub async fn display_settings(&self) -> Result<DisplaySettings> {
        match self.get_json::<DisplaySettings>(DISPLAY_SETTINGS_KEY).await {
            Ok(settings) => Ok(settings.unwrap_or_default()),
            Err(PortalError::Serialization(e)) => {
                warn!(error = %e, "Discarding unreadable display settings");
                Ok(DisplaySettings::default())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save_display_settings(&self, settings: &DisplaySettings) -> Result<()> {
        settings.validate()?;
        self.set_json(DISPLAY_SETTINGS_KEY, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::ProjectSetupRequest;
    use crate::types::DatabaseType;

    #[tokio::test]
    async fn test_session_flag() {
        let state = PersistentState::in_memory();
        assert!(!state.is_authenticated().await.unwrap());

        state.save_session("john.doe").await.unwrap();
        assert!(state.is_authenticated().await.unwrap());
        assert_eq!(state.username().await.unwrap().as_deref(), Some("john.doe"));

        state.clear_session().await.unwrap();
        assert!(!state.is_authenticated().await.unwrap());
        assert!(state.username().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flag_must_be_exactly_true() {
        let store = Arc::new(MemoryKvStore::new());
        store.set(AUTH_KEY, "yes").await.unwrap();
        let state = PersistentState::new(store);
        assert!(!state.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_store_writes_key_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).await.unwrap();
        store.set(USERNAME_KEY, "jane").await.unwrap();
        assert!(dir.path().join("username.json").exists());
        assert_eq!(store.get(USERNAME_KEY).await.unwrap().as_deref(), Some("jane"));

        store.remove(USERNAME_KEY).await.unwrap();
        store.remove(USERNAME_KEY).await.unwrap();
        assert!(store.get(USERNAME_KEY).await.unwrap().is_none());
        assert!(store.get("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_project_config_persists() {
        let dir = tempfile::tempdir().unwrap();
        let record = ProjectConfigRecord::from_request(ProjectSetupRequest::new(
            "HR",
            DatabaseType::PostgreSQL,
            "postgres://db/hr",
        ));
        {
            let state = PersistentState::new(Arc::new(FileKvStore::open(dir.path()).await.unwrap()));
            state.save_project_config(&record).await.unwrap();
        }
        let state = PersistentState::new(Arc::new(FileKvStore::open(dir.path()).await.unwrap()));
        assert_eq!(state.project_config().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_display_settings_fallbacks() {
        let store = Arc::new(MemoryKvStore::new());
        let state = PersistentState::new(store.clone());
        assert_eq!(state.display_settings().await.unwrap(), DisplaySettings::default());

        store.set(DISPLAY_SETTINGS_KEY, "not json").await.unwrap();
        assert_eq!(state.display_settings().await.unwrap(), DisplaySettings::default());

        let bad = DisplaySettings {
            page_size: 0,
            ..Default::default()
        };
        assert!(state.save_display_settings(&bad).await.is_err());
    }
}
