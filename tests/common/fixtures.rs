// Catalog and lineage fixtures for integration tests

use metaportal::catalog::{ColumnDraft, DataType, SchemaDraft, TableDraft};
use metaportal::lineage::{LineageDraft, MappingType, TransformationType};
use metaportal::types::{ColumnRef, TableRef};
use metaportal::Portal;

pub fn sales(table: &str, column: &str) -> ColumnRef {
    ColumnRef::new("SALES", table, column)
}

/// SALES and HR_SCHEMA with a few tables and columns each
pub async fn load_catalog(portal: &Portal) {
    for (schema, description) in [("SALES", "Sales"), ("HR_SCHEMA", "Human Resources Schema")] {
        portal
            .create_schema(SchemaDraft::new(schema, description))
            .await
            .expect("schema");
    }

    let tables = [
        ("SALES", "customers", vec!["id", "email"]),
        ("SALES", "orders", vec!["order_id", "customer_id", "total"]),
        ("SALES", "customer_summary", vec!["customer_id"]),
        ("HR_SCHEMA", "employees", vec!["employee_id", "salary"]),
    ];
    for (schema, table, columns) in tables {
        portal
            .create_table(TableDraft::new(schema, table))
            .await
            .expect("table");
        for column in columns {
            portal
                .create_column(
                    ColumnDraft::new(TableRef::new(schema, table), column, DataType::Number).numeric(10, 0),
                )
                .await
                .expect("column");
        }
    }
}

pub fn one_to_one(target: ColumnRef, source: ColumnRef) -> LineageDraft {
    LineageDraft::new()
        .with_target(target)
        .with_source(source, TransformationType::Direct)
}

pub fn system_field(target: ColumnRef) -> LineageDraft {
    LineageDraft::new()
        .with_target(target)
        .with_mapping_type(MappingType::SystemField)
}
