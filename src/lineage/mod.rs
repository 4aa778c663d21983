//! Column-level data lineage
//!
//! Records how source columns produce target columns:
//! - Typed mappings (one-to-one, many-to-one, system field)
//! - Form drafts with cascading schema, table and column selection
//! - Conjunctive search filters
//! - Column graph for upstream and downstream impact

pub mod draft;
pub mod filter;
pub mod graph;
pub mod mapping;
pub mod store;

pub use draft::{ColumnSelection, LineageDraft, SourceRow};
pub use filter::{filter_lineage, LineageFilter};
pub use graph::{ColumnGraph, RiskLevel, TraversalDirection};
pub use mapping::{LineageMapping, MappingSources, MappingType, SourceColumn, TransformationType};
pub use store::{LineageStore, MappingSummary, DEFAULT_CHANGE_REF_PREFIX};
