// Change log records

use crate::error::{PortalError, Result};
use crate::repository::Record;
use crate::types::{ProjectId, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of metadata edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Create,
    Update,
    Alter,
    Delete,
}

impl ChangeType {
    pub const ALL: [ChangeType; 4] = [
        ChangeType::Create,
        ChangeType::Update,
        ChangeType::Alter,
        ChangeType::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Create => "CREATE",
            ChangeType::Update => "UPDATE",
            ChangeType::Alter => "ALTER",
            ChangeType::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ChangeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PortalError::InvalidInput(format!("unknown change type: {}", s)))
    }
}

/// One edit in a project's change log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: RecordId,
    pub project_id: ProjectId,
    pub change_ref_number: String,
    pub timestamp: Timestamp,
    pub user: String,
    pub change_type: ChangeType,
    pub table: String,
    pub column: String,
    pub description: String,
}

impl Record for ChangeRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Fields of a change to record; id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub change_ref_number: String,
    pub user: String,
    pub change_type: ChangeType,
    pub table: String,
    pub column: String,
    pub description: String,
    /// Defaults to the time of recording
    pub timestamp: Option<Timestamp>,
}

impl ChangeEntry {
    pub fn new(change_ref_number: &str, user: &str, change_type: ChangeType) -> Self {
        Self {
            change_ref_number: change_ref_number.to_string(),
            user: user.to_string(),
            change_type,
            table: String::new(),
            column: String::new(),
            description: String::new(),
            timestamp: None,
        }
    }

    pub fn on(mut self, table: &str, column: &str) -> Self {
        self.table = table.to_string();
        self.column = column.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
