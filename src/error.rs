//! Error types for the metadata portal.
//!
//! This module provides a unified error type [`PortalError`] for all portal
//! operations, along with a convenient [`Result`] type alias.
//!
//! # Error Categories
//!
//! - **Catalog**: missing or duplicate schemas, tables and columns
//! - **Validation**: drafts that break a data-model invariant
//! - **Setup**: the project setup flow, which surfaces a single user-visible message
//! - **Storage**: the persisted key-value state
//! - **Configuration**: invalid settings or missing configuration
//!
//! # Example
//!
//! ```rust
//! use metaportal::error::{PortalError, Result};
//!
//! fn require_name(name: &str) -> Result<()> {
//!     if name.trim().is_empty() {
//!         return Err(PortalError::InvalidInput("name cannot be empty".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_name("HR_SCHEMA").is_ok());
//! assert!(require_name(" ").is_err());
//! ```

use std::io;
use thiserror::Error;

/// The message shown to the user when project setup fails for any reason.
pub const SETUP_FAILED_MESSAGE: &str =
    "Failed to setup project. Please check your connection string and try again.";

/// Main error type for portal operations.
#[derive(Error, Debug)]
pub enum PortalError {
    // Catalog and repository errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Table not found: {schema}.{table}")]
    TableNotFound { schema: String, table: String },

    #[error("Project not found: {0}")]
    ProjectNotFound(u64),

    // Input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Setup flow. The display text is the only thing the user ever sees.
    #[error("{}", SETUP_FAILED_MESSAGE)]
    SetupFailed { cause: String },

    // Backend errors
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PortalError::Unavailable(_) | PortalError::Timeout(_))
    }

    /// Whether the error names a record that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PortalError::NotFound(_)
                | PortalError::SchemaNotFound(_)
                | PortalError::TableNotFound { .. }
                | PortalError::ProjectNotFound(_)
        )
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::Serialization(e.to_string())
    }
}

/// Result type alias for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_failed_shows_fixed_message() {
        let err = PortalError::SetupFailed {
            cause: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), SETUP_FAILED_MESSAGE);
    }

    #[test]
    fn test_retryable() {
        assert!(PortalError::Unavailable("backend".into()).is_retryable());
        assert!(PortalError::Timeout(500).is_retryable());
        assert!(!PortalError::NotFound("x".into()).is_retryable());
    }

    #[test]
    fn test_not_found_family() {
        assert!(PortalError::SchemaNotFound("HR".into()).is_not_found());
        assert!(PortalError::TableNotFound {
            schema: "HR".into(),
            table: "employees".into()
        }
        .is_not_found());
        assert!(!PortalError::AlreadyExists("HR".into()).is_not_found());
    }
}
