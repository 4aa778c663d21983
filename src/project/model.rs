// Projects

use crate::error::{PortalError, Result};
use crate::repository::Record;
use crate::types::{now, ProjectId, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => f.write_str("active"),
            ProjectStatus::Maintenance => f.write_str("maintenance"),
            ProjectStatus::Inactive => f.write_str("inactive"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "maintenance" => Ok(ProjectStatus::Maintenance),
            "inactive" => Ok(ProjectStatus::Inactive),
            other => Err(PortalError::InvalidInput(format!("unknown project status: {}", other))),
        }
    }
}

/// A project scopes a set of schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub schemas: BTreeSet<String>,
    pub last_updated: Timestamp,
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            description: description.to_string(),
            schemas: BTreeSet::new(),
            last_updated: now(),
            status: ProjectStatus::Active,
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schemas.insert(schema.to_string());
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether `schema` belongs to this project
    pub fn scopes(&self, schema: &str) -> bool {
        self.schemas.contains(schema)
    }
}

impl Record for Project {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
