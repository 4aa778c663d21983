//! metaportal - the data model behind a metadata management portal.
//!
//! Catalogues database schemas, tables and columns, records column-level
//! lineage between them, and keeps a per-project change log with derived
//! statistics. A small key-value store persists the login flag, the project
//! configuration and display settings.
//!
//! # Features
//!
//! - **Catalog**: typed engine data types with sizing checked per type.
//! - **Lineage**: one-to-one, many-to-one and system field mappings with sequential change references.
//! - **Change Log**: per-project history with conjunctive search.
//! - **Reports**: lineage coverage and impact analysis.
//! - **Backend Seam**: every mutation is acknowledged by a [`backend::MetadataBackend`] first.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Portal                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Stores: Catalog | Lineage | Change Log | Projects | Admin  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Queries: Filters | Project Stats | Reports                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Backend (async trait) | Persistent State (key-value)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use metaportal::catalog::SchemaDraft;
//! use metaportal::config::PortalConfig;
//! use metaportal::Portal;
//!
//! #[tokio::main]
//! async fn main() -> metaportal::Result<()> {
//!     let portal = Portal::open(PortalConfig::development()).await?;
//!     portal
//!         .create_schema(SchemaDraft::new("HR_SCHEMA", "Human Resources Schema"))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod types;

pub mod admin;
pub mod backend;
pub mod catalog;
pub mod changelog;
pub mod cli;
pub mod lineage;
pub mod observability;
pub mod portal;
pub mod project;
pub mod reports;
pub mod repository;
pub mod seed;
pub mod settings;
pub mod setup;
pub mod storage;

pub use error::{PortalError, Result};
pub use portal::Portal;
