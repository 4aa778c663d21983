//! Metadata catalog
//!
//! Schemas, tables and columns of the catalogued database:
//! - Typed records with engine data types and sizing
//! - Pure, restartable filter queries
//! - An async store enforcing name uniqueness and parent existence

pub mod model;
pub mod query;
pub mod store;

pub use model::{Column, ColumnDraft, ColumnSize, DataType, Schema, SchemaDraft, Table, TableDraft};
pub use query::{filter_columns, filter_tables, search_schemas};
pub use store::{CatalogCounts, CatalogStore};
