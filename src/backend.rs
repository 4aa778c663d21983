//! Remote side of the portal.
//!
//! Every create and update is submitted to a [`MetadataBackend`] and awaited
//! before the in-memory stores change. No real backend exists yet;
//! [`SimulatedBackend`] acknowledges after a fixed latency and can be told to
//! fail, which is how the setup error path is exercised.

use crate::admin::DatabaseConnection;
use crate::error::{PortalError, Result};
use crate::setup::ProjectSetupRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Kind of mutation being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => f.write_str("create"),
            Operation::Update => f.write_str("update"),
            Operation::Delete => f.write_str("delete"),
        }
    }
}

/// A mutation awaiting acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Entity kind, e.g. "schema" or "lineage"
    pub entity: String,
    pub operation: Operation,
    /// Human readable key of the affected record
    pub key: String,
}

impl Submission {
    pub fn new(entity: &str, operation: Operation, key: impl Into<String>) -> Self {
        Self {
            entity: entity.to_string(),
            operation,
            key: key.into(),
        }
    }
}

/// Backend statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStats {
    pub submissions: u64,
    pub failures: u64,
}

/// Remote metadata service
#[async_trait]
pub trait MetadataBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Provisions the metadata version tables for a new project
    async fn setup_project(&self, request: &ProjectSetupRequest) -> Result<()>;

    /// Acknowledges a mutation
    async fn submit(&self, submission: &Submission) -> Result<()>;

    /// Lists the tables of `schema` in the live database
    async fn pull_schema(&self, schema: &str) -> Result<Vec<String>>;

    /// Imports column metadata from an uploaded CSV file, returning rows read
    async fn import_csv(&self, file_name: &str) -> Result<usize>;

    /// Whether the database behind `connection` is reachable
    async fn test_connection(&self, connection: &DatabaseConnection) -> Result<bool>;

    fn stats(&self) -> BackendStats;
}

/// In-process backend that acknowledges after a fixed latency
pub struct SimulatedBackend {
    latency: Duration,
    offline: AtomicBool,
    fail_setup: AtomicBool,
    submissions: AtomicU64,
    failures: AtomicU64,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            offline: AtomicBool::new(false),
            fail_setup: AtomicBool::new(false),
            submissions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// While offline every call fails as unavailable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes project setup fail while everything else succeeds
    pub fn set_fail_setup(&self, fail: bool) {
        self.fail_setup.store(fail, Ordering::SeqCst);
    }

    async fn round_trip(&self, what: &str) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.submissions.fetch_add(1, Ordering::Relaxed);
        if self.offline.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::Relaxed);
            return Err(PortalError::Unavailable(format!("{} rejected: backend offline", what)));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn setup_project(&self, request: &ProjectSetupRequest) -> Result<()> {
        self.round_trip("setup").await?;
        if self.fail_setup.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::Relaxed);
            return Err(PortalError::Unavailable(format!(
                "cannot reach {} database for {}",
                request.database_type, request.project_name
            )));
        }
        debug!(project = %request.project_name, "Setup acknowledged");
        Ok(())
    }

    async fn submit(&self, submission: &Submission) -> Result<()> {
        self.round_trip(&submission.entity).await?;
        debug!(
            entity = %submission.entity,
            operation = %submission.operation,
            key = %submission.key,
            "Submission acknowledged"
        );
        Ok(())
    }

    async fn pull_schema(&self, schema: &str) -> Result<Vec<String>> {
        self.round_trip("pull").await?;
        debug!(schema, "Schema pull returned no tables");
        Ok(Vec::new())
    }

    async fn import_csv(&self, file_name: &str) -> Result<usize> {
        self.round_trip("import").await?;
        debug!(file_name, "CSV import read no rows");
        Ok(0)
    }

    async fn test_connection(&self, connection: &DatabaseConnection) -> Result<bool> {
        self.round_trip("connection test").await?;
        Ok(!connection.host.trim().is_empty())
    }

    fn stats(&self) -> BackendStats {
        BackendStats {
            submissions: self.submissions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
