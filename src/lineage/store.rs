// Lineage store

use super::draft::LineageDraft;
use super::filter::{filter_lineage, LineageFilter};
use super::mapping::{LineageMapping, MappingType};
use crate::error::{PortalError, Result};
use crate::repository::Repository;
use crate::types::{now, RecordId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default change reference prefix
pub const DEFAULT_CHANGE_REF_PREFIX: &str = "CHG-2024";

/// In-memory lineage mappings, newest first
pub struct LineageStore {
    mappings: Repository<LineageMapping>,
    change_ref_prefix: String,
}

impl Default for LineageStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_REF_PREFIX)
    }
}

impl LineageStore {
    /// Creates an empty store issuing change references as `<prefix>-NNN`
    pub fn new(change_ref_prefix: &str) -> Self {
        Self {
            mappings: Repository::new("lineage mapping"),
            change_ref_prefix: change_ref_prefix.to_string(),
        }
    }

    /// Change reference for the `seq`-th mapping
    pub fn change_ref(&self, seq: usize) -> String {
        format!("{}-{:03}", self.change_ref_prefix, seq)
    }

    /// Creates a mapping from a submittable draft.
    ///
    /// The new mapping is prepended, gets the next sequential id and the
    /// change reference numbered one past the current mapping count.
    pub async fn create(&self, draft: LineageDraft, created_by: &str) -> Result<LineageMapping> {
        let parts = draft.into_parts()?;
        let created = self
            .mappings
            .insert_with(|existing, id| {
                Ok(LineageMapping {
                    id,
                    target_schema: parts.target.schema,
                    target_table: parts.target.table,
                    target_column: parts.target.column,
                    transformation_type: parts.transformation_type,
                    transformation_logic: parts.transformation_logic,
                    sources: parts.sources,
                    change_ref_number: self.change_ref(existing.len() + 1),
                    created_at: now(),
                    created_by: created_by.to_string(),
                })
            })
            .await?;

        info!(
            id = created.id,
            target = %created.target(),
            mapping_type = %created.mapping_type(),
            change_ref = %created.change_ref_number,
            "Lineage mapping created"
        );
        Ok(created)
    }

    /// Replaces target, sources and logic of an existing mapping.
    /// Change reference and authorship are kept.
    pub async fn update(&self, id: RecordId, draft: LineageDraft) -> Result<LineageMapping> {
        let parts = draft.into_parts()?;
        let updated = self
            .mappings
            .update(id, |m| {
                m.target_schema = parts.target.schema;
                m.target_table = parts.target.table;
                m.target_column = parts.target.column;
                m.transformation_type = parts.transformation_type;
                m.transformation_logic = parts.transformation_logic;
                m.sources = parts.sources;
            })
            .await?;
        info!(id, change_ref = %updated.change_ref_number, "Lineage mapping updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: RecordId) -> bool {
        self.mappings.delete(id).await
    }

    pub async fn get(&self, id: RecordId) -> Option<LineageMapping> {
        self.mappings.get(id).await
    }

    /// Looks a mapping up by change reference (exact, case-insensitive)
    pub async fn by_change_ref(&self, change_ref: &str) -> Result<LineageMapping> {
        self.mappings
            .read(|m| {
                m.iter()
                    .find(|m| m.change_ref_number.eq_ignore_ascii_case(change_ref))
                    .cloned()
            })
            .await
            .ok_or_else(|| PortalError::NotFound(format!("lineage {}", change_ref)))
    }

    pub async fn list(&self) -> Vec<LineageMapping> {
        self.mappings.list().await
    }

    pub async fn filter(&self, filter: &LineageFilter) -> Vec<LineageMapping> {
        self.mappings
            .read(|m| filter_lineage(m, filter).cloned().collect())
            .await
    }

    /// Mappings whose target schema is accepted by `in_scope`
    pub async fn count_targets<F>(&self, in_scope: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.mappings
            .read(|m| m.iter().filter(|m| in_scope(&m.target_schema)).count())
            .await
    }

    /// Counts per mapping type
    pub async fn summary(&self) -> MappingSummary {
        self.mappings.read(MappingSummary::from_mappings).await
    }

    pub async fn len(&self) -> usize {
        self.mappings.len().await
    }

    pub async fn reset(&self) {
        self.mappings.clear().await;
    }
}

/// Number of mappings per mapping type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub one_to_one: usize,
    pub many_to_one: usize,
    pub system_field: usize,
}

impl MappingSummary {
    pub fn from_mappings(mappings: &[LineageMapping]) -> Self {
        mappings.iter().fold(Self::default(), |mut acc, m| {
            match m.mapping_type() {
                MappingType::OneToOne => acc.one_to_one += 1,
                MappingType::ManyToOne => acc.many_to_one += 1,
                MappingType::SystemField => acc.system_field += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.one_to_one + self.many_to_one + self.system_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::mapping::TransformationType;
    use crate::types::ColumnRef;

    fn col(table: &str, column: &str) -> ColumnRef {
        ColumnRef::new("SALES", table, column)
    }

    fn one_to_one(target: ColumnRef, source: ColumnRef) -> LineageDraft {
        LineageDraft::new()
            .with_target(target)
            .with_source(source, TransformationType::Direct)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_change_ref() {
        let store = LineageStore::default();
        let first = store
            .create(one_to_one(col("customer_summary", "customer_id"), col("customers", "id")), "john.doe")
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.change_ref_number, "CHG-2024-001");
        assert_eq!(first.created_by, "john.doe");

        let second = store
            .create(
                LineageDraft::new()
                    .with_target(col("user_profile", "last_login"))
                    .with_mapping_type(MappingType::SystemField),
                "system",
            )
            .await
            .unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(second.change_ref_number, "CHG-2024-002");

        let all = store.list().await;
        assert_eq!(all[0].id, 2, "new mappings are prepended");
    }

    #[tokio::test]
    async fn test_incomplete_draft_rejected() {
        let store = LineageStore::default();
        let err = store
            .create(LineageDraft::new().with_target(col("orders", "id")), "user")
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidInput(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_change_ref() {
        let store = LineageStore::new("CHG-2025");
        let created = store
            .create(one_to_one(col("orders", "customer_id"), col("customers", "id")), "user")
            .await
            .unwrap();
        assert_eq!(created.change_ref_number, "CHG-2025-001");

        let updated = store
            .update(
                created.id,
                LineageDraft::new()
                    .with_target(col("orders", "customer_id"))
                    .with_mapping_type(MappingType::ManyToOne)
                    .with_source(col("customers", "id"), TransformationType::Direct)
                    .with_source(col("customers", "legacy_id"), TransformationType::Conditional),
            )
            .await
            .unwrap();
        assert_eq!(updated.change_ref_number, "CHG-2025-001");
        assert_eq!(updated.source_columns().len(), 2);
        assert!(store.update(42, one_to_one(col("a", "b"), col("c", "d"))).await.is_err());
    }

    #[tokio::test]
    async fn test_summary_and_lookup() {
        let store = LineageStore::default();
        store
            .create(one_to_one(col("orders", "customer_id"), col("customers", "id")), "user")
            .await
            .unwrap();
        store
            .create(
                LineageDraft::new()
                    .with_target(col("user_profile", "last_login"))
                    .with_mapping_type(MappingType::SystemField),
                "system",
            )
            .await
            .unwrap();

        let summary = store.summary().await;
        assert_eq!(summary.one_to_one, 1);
        assert_eq!(summary.system_field, 1);
        assert_eq!(summary.total(), 2);

        let found = store.by_change_ref("chg-2024-002").await.unwrap();
        assert_eq!(found.target_table, "user_profile");
        assert!(store.by_change_ref("CHG-2024-999").await.is_err());
    }
}
