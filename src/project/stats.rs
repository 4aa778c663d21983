// Derived project statistics

use super::model::Project;
use crate::catalog::CatalogStore;
use crate::changelog::ChangeLogStore;
use crate::lineage::LineageStore;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Dashboard counters for one project. Always computed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_tables: usize,
    pub total_columns: usize,
    pub lineage_mappings: usize,
    pub recent_changes: usize,
}

impl ProjectStats {
    /// Aggregates the stores for `project`.
    ///
    /// Tables and columns count when their schema is in the project, lineage
    /// when its target schema is, and changes recorded at or after `since`.
    pub async fn collect(
        project: &Project,
        catalog: &CatalogStore,
        lineage: &LineageStore,
        changes: &ChangeLogStore,
        since: Timestamp,
    ) -> Self {
        let counts = catalog.counts(|schema| project.scopes(schema)).await;
        Self {
            total_tables: counts.tables,
            total_columns: counts.columns,
            lineage_mappings: lineage.count_targets(|schema| project.scopes(schema)).await,
            recent_changes: changes.count_since(project.id, since).await,
        }
    }
}
