// Catalog store: schemas, tables and columns

use super::model::{Column, ColumnDraft, Schema, SchemaDraft, Table, TableDraft};
use super::query::{filter_columns, filter_tables};
use crate::error::{PortalError, Result};
use crate::repository::Repository;
use crate::types::{now, RecordId, TableRef};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

/// In-memory catalog of schemas, tables and columns
pub struct CatalogStore {
    schemas: Repository<Schema>,
    tables: Repository<Table>,
    columns: Repository<Column>,
    /// Held by changes that must see tables and columns together
    structure: Mutex<()>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self {
            schemas: Repository::new("schema"),
            tables: Repository::new("table"),
            columns: Repository::new("column"),
            structure: Mutex::new(()),
        }
    }

    /// Creates a schema. Names are unique.
    pub async fn create_schema(&self, draft: SchemaDraft) -> Result<Schema> {
        let schema = draft.into_schema()?;
        let created = self
            .schemas
            .insert_with(|existing, _| {
                if existing.iter().any(|s| s.name == schema.name) {
                    return Err(PortalError::AlreadyExists(format!("schema {}", schema.name)));
                }
                Ok(schema)
            })
            .await?;

        info!(schema = %created.name, id = created.id, "Schema created");
        Ok(created)
    }

    /// Creates a table in an existing schema. (schema, name) is unique.
    pub async fn create_table(&self, draft: TableDraft) -> Result<Table> {
        let table = draft.into_table()?;
        let _structure = self.structure.lock().await;
        if self.schema_by_name(&table.schema_name).await.is_none() {
            return Err(PortalError::SchemaNotFound(table.schema_name));
        }

        let created = self
            .tables
            .insert_with(|existing, _| {
                if existing
                    .iter()
                    .any(|t| t.schema_name == table.schema_name && t.name == table.name)
                {
                    return Err(PortalError::AlreadyExists(format!("table {}", table.table_ref())));
                }
                Ok(table)
            })
            .await?;

        info!(table = %created.table_ref(), id = created.id, "Table created");
        Ok(created)
    }

    /// Creates a column in an existing table. Names are unique per table.
    pub async fn create_column(&self, draft: ColumnDraft) -> Result<Column> {
        let column = draft.into_column()?;
        let _structure = self.structure.lock().await;
        if self.table_by_ref(&column.table_ref).await.is_none() {
            return Err(PortalError::TableNotFound {
                schema: column.table_ref.schema,
                table: column.table_ref.table,
            });
        }

        let created = self
            .columns
            .insert_with(|existing, _| {
                if existing
                    .iter()
                    .any(|c| c.table_ref == column.table_ref && c.name == column.name)
                {
                    return Err(PortalError::AlreadyExists(format!(
                        "column {}.{}",
                        column.table_ref, column.name
                    )));
                }
                Ok(column)
            })
            .await?;

        info!(table = %created.table_ref, column = %created.name, id = created.id, "Column created");
        self.touch_table(&created.table_ref).await;
        Ok(created)
    }

    /// Updates a schema description
    pub async fn update_schema(&self, id: RecordId, description: &str) -> Result<Schema> {
        self.schemas
            .update(id, |s| {
                s.description = description.to_string();
                s.updated_at = now();
            })
            .await
    }

    /// Updates a table's business definition
    pub async fn update_table(&self, id: RecordId, business_definition: &str) -> Result<Table> {
        self.tables
            .update(id, |t| {
                t.business_definition = business_definition.to_string();
                t.updated_at = now();
            })
            .await
    }

    /// Replaces a column definition. The column keeps its table and name.
    pub async fn update_column(&self, id: RecordId, draft: ColumnDraft) -> Result<Column> {
        let current = self
            .columns
            .get(id)
            .await
            .ok_or_else(|| PortalError::NotFound(format!("column {}", id)))?;
        let mut column = draft.into_column()?;
        column.id = id;
        column.table_ref = current.table_ref.clone();
        column.name = current.name;
        self.columns.replace(column.clone()).await?;
        self.touch_table(&column.table_ref).await;
        Ok(column)
    }

    /// Deletes a table and its columns
    pub async fn delete_table(&self, id: RecordId) -> Result<bool> {
        let _structure = self.structure.lock().await;
        let Some(table) = self.tables.get(id).await else {
            return Ok(false);
        };
        let table_ref = table.table_ref();
        let removed = self.columns.delete_where(|c| c.table_ref == table_ref).await;
        self.tables.delete(id).await;
        info!(table = %table_ref, columns = removed, "Table deleted");
        Ok(true)
    }

    /// Deletes a column
    pub async fn delete_column(&self, id: RecordId) -> bool {
        self.columns.delete(id).await
    }

    pub async fn schemas(&self) -> Vec<Schema> {
        self.schemas.list().await
    }

    /// Tables, optionally restricted to one schema
    pub async fn tables(&self, schema: Option<&str>) -> Vec<Table> {
        self.tables
            .read(|tables| filter_tables(tables, schema).cloned().collect())
            .await
    }

    /// Columns, optionally restricted to one table
    pub async fn columns(&self, table: Option<&TableRef>) -> Vec<Column> {
        self.columns
            .read(|columns| filter_columns(columns, table).cloned().collect())
            .await
    }

    pub async fn schema_by_name(&self, name: &str) -> Option<Schema> {
        self.schemas
            .read(|schemas| schemas.iter().find(|s| s.name == name).cloned())
            .await
    }

    pub async fn table_by_ref(&self, table_ref: &TableRef) -> Option<Table> {
        self.tables
            .read(|tables| tables.iter().find(|t| &t.table_ref() == table_ref).cloned())
            .await
    }

    pub async fn column(&self, id: RecordId) -> Option<Column> {
        self.columns.get(id).await
    }

    /// Table and column counts for the schemas accepted by `in_scope`
    pub async fn counts<F>(&self, in_scope: F) -> CatalogCounts
    where
        F: Fn(&str) -> bool,
    {
        let schemas = self
            .schemas
            .read(|s| s.iter().filter(|s| in_scope(&s.name)).count())
            .await;
        let tables = self
            .tables
            .read(|t| t.iter().filter(|t| in_scope(&t.schema_name)).count())
            .await;
        let columns = self
            .columns
            .read(|c| c.iter().filter(|c| in_scope(&c.table_ref.schema)).count())
            .await;
        CatalogCounts {
            schemas,
            tables,
            columns,
        }
    }

    /// Removes every schema, table and column
    pub async fn reset(&self) {
        let _structure = self.structure.lock().await;
        self.columns.clear().await;
        self.tables.clear().await;
        self.schemas.clear().await;
        info!("Catalog reset");
    }

    async fn touch_table(&self, table_ref: &TableRef) {
        let id = self
            .tables
            .read(|tables| tables.iter().find(|t| &t.table_ref() == table_ref).map(|t| t.id))
            .await;
        if let Some(id) = id {
            let _ = self.tables.update(id, |t| t.updated_at = now()).await;
        }
    }
}

/// Record counts for part of the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub schemas: usize,
    pub tables: usize,
    pub columns: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::DataType;

    async fn hr_catalog() -> CatalogStore {
        let catalog = CatalogStore::new();
        catalog
            .create_schema(SchemaDraft::new("HR_SCHEMA", "Human Resources Schema"))
            .await
            .unwrap();
        catalog
            .create_table(TableDraft::new("HR_SCHEMA", "employees").business_definition("Employee master data"))
            .await
            .unwrap();
        catalog
    }

    fn employees() -> TableRef {
        TableRef::new("HR_SCHEMA", "employees")
    }

    #[tokio::test]
    async fn test_schema_names_unique() {
        let catalog = hr_catalog().await;
        let err = catalog
            .create_schema(SchemaDraft::new("HR_SCHEMA", "again"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::AlreadyExists(_)));
        assert_eq!(catalog.schemas().await.len(), 1);
    }

    #[tokio::test]
    async fn test_table_requires_schema_and_unique_name() {
        let catalog = hr_catalog().await;

        let err = catalog
            .create_table(TableDraft::new("SALES", "orders"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::SchemaNotFound(_)));

        let err = catalog
            .create_table(TableDraft::new("HR_SCHEMA", "employees"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_same_table_name_in_other_schema() {
        let catalog = hr_catalog().await;
        catalog
            .create_schema(SchemaDraft::new("FINANCE_SCHEMA", ""))
            .await
            .unwrap();
        catalog
            .create_table(TableDraft::new("FINANCE_SCHEMA", "employees"))
            .await
            .unwrap();
        assert_eq!(catalog.tables(None).await.len(), 2);
        assert_eq!(catalog.tables(Some("FINANCE_SCHEMA")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_column_lifecycle() {
        let catalog = hr_catalog().await;

        let err = catalog
            .create_column(ColumnDraft::new(TableRef::new("HR_SCHEMA", "nope"), "x", DataType::Date))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::TableNotFound { .. }));

        let salary = catalog
            .create_column(
                ColumnDraft::new(employees(), "salary", DataType::Number)
                    .numeric(10, 2)
                    .default_value("0"),
            )
            .await
            .unwrap();
        assert_eq!(salary.default_value.as_deref(), Some("0"));

        let updated = catalog
            .update_column(salary.id, ColumnDraft::new(employees(), "ignored", DataType::Number).numeric(12, 2))
            .await
            .unwrap();
        assert_eq!(updated.name, "salary");
        assert_eq!(updated.type_display(), "NUMBER(12,2)");

        assert_eq!(catalog.columns(Some(&employees())).await.len(), 1);
        assert!(catalog.delete_column(salary.id).await);
        assert!(catalog.columns(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_table_cascades_columns() {
        let catalog = hr_catalog().await;
        catalog
            .create_column(ColumnDraft::new(employees(), "employee_id", DataType::Number).primary_key())
            .await
            .unwrap();
        let table = catalog.table_by_ref(&employees()).await.unwrap();

        assert!(catalog.delete_table(table.id).await.unwrap());
        assert!(catalog.columns(None).await.is_empty());
        assert!(!catalog.delete_table(table.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_counts_and_reset() {
        let catalog = hr_catalog().await;
        catalog
            .create_column(ColumnDraft::new(employees(), "first_name", DataType::Varchar2).length(50))
            .await
            .unwrap();

        let counts = catalog.counts(|s| s == "HR_SCHEMA").await;
        assert_eq!(counts, CatalogCounts { schemas: 1, tables: 1, columns: 1 });
        assert_eq!(catalog.counts(|_| false).await, CatalogCounts::default());

        catalog.reset().await;
        assert!(catalog.schemas().await.is_empty());
        assert!(catalog.tables(None).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_table_delete_leaves_no_orphans() {
        for _ in 0..20 {
            let catalog = std::sync::Arc::new(hr_catalog().await);
            let table_id = catalog.tables(None).await[0].id;

            let mut handles = Vec::new();
            for i in 0..8 {
                let catalog = catalog.clone();
                handles.push(tokio::spawn(async move {
                    let _ = catalog
                        .create_column(ColumnDraft::new(employees(), &format!("c{}", i), DataType::Date))
                        .await;
                }));
            }
            let deleter = {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.delete_table(table_id).await })
            };
            for handle in handles {
                handle.await.unwrap();
            }
            assert!(deleter.await.unwrap().unwrap());

            assert!(catalog.tables(None).await.is_empty());
            assert!(catalog.columns(None).await.is_empty());
        }
    }
}
