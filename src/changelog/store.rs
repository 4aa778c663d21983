// Change log store

use super::filter::{filter_changes, ChangeFilter};
use super::record::{ChangeEntry, ChangeRecord};
use crate::repository::Repository;
use crate::types::{now, ProjectId, Timestamp};
use tracing::info;

/// Change records of every project
pub struct ChangeLogStore {
    changes: Repository<ChangeRecord>,
}

impl Default for ChangeLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeLogStore {
    pub fn new() -> Self {
        Self {
            changes: Repository::new("change record"),
        }
    }

    /// Records a change against a project
    pub async fn record_change(&self, project_id: ProjectId, entry: ChangeEntry) -> ChangeRecord {
        let record = self
            .changes
            .insert(ChangeRecord {
                id: 0,
                project_id,
                change_ref_number: entry.change_ref_number,
                timestamp: entry.timestamp.unwrap_or_else(now),
                user: entry.user,
                change_type: entry.change_type,
                table: entry.table,
                column: entry.column,
                description: entry.description,
            })
            .await;
        info!(
            project_id,
            id = record.id,
            change_type = %record.change_type,
            change_ref = %record.change_ref_number,
            "Change recorded"
        );
        record
    }

    /// A project's changes, newest first
    pub async fn list(&self, project_id: ProjectId) -> Vec<ChangeRecord> {
        let mut changes: Vec<ChangeRecord> = self
            .changes
            .read(|c| c.iter().filter(|r| r.project_id == project_id).cloned().collect())
            .await;
        changes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        changes
    }

    /// A project's changes matching `filter`, newest first
    pub async fn filter(&self, project_id: ProjectId, filter: &ChangeFilter) -> Vec<ChangeRecord> {
        let changes = self.list(project_id).await;
        filter_changes(&changes, filter).cloned().collect()
    }

    /// Number of a project's changes at or after `since`
    pub async fn count_since(&self, project_id: ProjectId, since: Timestamp) -> usize {
        self.changes
            .read(|c| {
                c.iter()
                    .filter(|r| r.project_id == project_id && r.timestamp >= since)
                    .count()
            })
            .await
    }

    pub async fn len(&self) -> usize {
        self.changes.len().await
    }

    pub async fn reset(&self) {
        self.changes.clear().await;
    }
}
