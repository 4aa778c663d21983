//! Project setup records.
//!
//! A setup request names the project and the database it documents. Once the
//! backend accepts it, the portal persists a [`ProjectConfigRecord`] listing
//! the metadata version tables created for the project.

use crate::error::{PortalError, Result};
use crate::types::{now, DatabaseType, Timestamp};
use serde::{Deserialize, Serialize};

/// Suffixes of the metadata version tables created per project
pub const METADATA_TABLE_SUFFIXES: [&str; 5] = [
    "schema_metadata_version",
    "Table_metadata_version",
    "column_metadata_version",
    "Lineage_metadata_version",
    "User_metadata_version",
];

/// Names of the metadata version tables for `project_name`
pub fn metadata_tables(project_name: &str) -> Vec<String> {
    METADATA_TABLE_SUFFIXES
        .iter()
        .map(|suffix| format!("{}_{}", project_name, suffix))
        .collect()
}

/// Project setup form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSetupRequest {
    pub project_name: String,
    pub project_description: String,
    pub database_type: DatabaseType,
    pub connection_string: String,
}

impl ProjectSetupRequest {
    pub fn new(project_name: &str, database_type: DatabaseType, connection_string: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            project_description: String::new(),
            database_type,
            connection_string: connection_string.to_string(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.project_description = description.to_string();
        self
    }

    /// Submit gate: a project name and a connection string are required
    pub fn can_submit(&self) -> bool {
        !self.project_name.trim().is_empty() && !self.connection_string.trim().is_empty()
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(PortalError::InvalidInput("project name is required".into()));
        }
        if self.connection_string.trim().is_empty() {
            return Err(PortalError::InvalidInput("connection string is required".into()));
        }
        Ok(())
    }
}

/// Status of a configured project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStatus {
    #[default]
    Active,
    Inactive,
}

/// Persisted project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfigRecord {
    pub project_name: String,
    pub project_description: String,
    pub database_type: DatabaseType,
    pub connection_string: String,
    pub tables: Vec<String>,
    pub setup_date: Timestamp,
    pub status: ConfigStatus,
}

impl ProjectConfigRecord {
    /// Record for a freshly set up project
    pub fn from_request(request: ProjectSetupRequest) -> Self {
        let tables = metadata_tables(&request.project_name);
        Self {
            project_name: request.project_name,
            project_description: request.project_description,
            database_type: request.database_type,
            connection_string: request.connection_string,
            tables,
            setup_date: now(),
            status: ConfigStatus::Active,
        }
    }
}
