//! Core type definitions shared across the portal.
//!
//! # Type Aliases
//!
//! - [`RecordId`] = `u64`: sequential identifier assigned by a repository
//! - [`ProjectId`] = `u64`: project identifier
//! - [`Timestamp`] = `DateTime<Utc>`
//!
//! # Examples
//!
//! ```rust
//! use metaportal::types::{DatabaseType, TableRef};
//!
//! let table = TableRef::new("HR_SCHEMA", "employees");
//! assert_eq!(table.to_string(), "HR_SCHEMA.employees");
//!
//! let db: DatabaseType = "SQL Server".parse().unwrap();
//! assert_eq!(db, DatabaseType::SqlServer);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PortalError;

/// Sequential identifier assigned by a repository.
pub type RecordId = u64;

/// Unique identifier for a project.
pub type ProjectId = u64;

/// Point in time, always UTC.
pub type Timestamp = DateTime<Utc>;

/// Current time.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Reference to a table by schema and table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Fully qualified column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub schema: String,
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.schema, &self.table)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.schema, self.table, self.column)
    }
}

/// Database engine a project or connection targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    #[default]
    Oracle,
    PostgreSQL,
    MySQL,
    #[serde(rename = "SQL Server")]
    SqlServer,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 4] = [
        DatabaseType::Oracle,
        DatabaseType::PostgreSQL,
        DatabaseType::MySQL,
        DatabaseType::SqlServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Oracle => "Oracle",
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::MySQL => "MySQL",
            DatabaseType::SqlServer => "SQL Server",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatabaseType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PortalError::InvalidInput(format!("unknown database type: {}", s)))
    }
}

/// Case-insensitive substring match. An empty needle always matches.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Treats `None` and empty strings alike as "no filter".
pub(crate) fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
