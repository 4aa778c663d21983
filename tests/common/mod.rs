//! Common test utilities for integration tests.

pub mod fixtures;

use metaportal::backend::SimulatedBackend;
use metaportal::config::PortalConfig;
use metaportal::storage::{FileKvStore, PersistentState};
use metaportal::Portal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub use fixtures::*;

/// Test environment owning a temporary state directory.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub backend: Arc<SimulatedBackend>,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("state");

        Self {
            temp_dir,
            data_dir,
            backend: Arc::new(SimulatedBackend::new(Duration::ZERO)),
        }
    }

    /// Development config pointing at this environment's state directory
    pub fn config(&self) -> PortalConfig {
        let mut config = PortalConfig::development();
        config.storage.data_dir = self.data_dir.clone();
        config
    }

    /// A fresh portal over this environment's files and shared backend
    pub async fn portal(&self) -> Portal {
        let store = FileKvStore::open(&self.data_dir)
            .await
            .expect("Failed to open state directory");
        Portal::new(
            self.config(),
            self.backend.clone(),
            PersistentState::new(Arc::new(store)),
        )
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
