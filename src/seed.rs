//! Demo data.
//!
//! Populates a portal with a small sales and HR catalog, lineage between
//! them, two projects with change history, and the admin registries. Used
//! by the CLI and by tests that need a realistic starting point.

use crate::admin::{ConnectionStatus, DatabaseConnection, PortalUser, UserRole, UserStatus};
use crate::catalog::{ColumnDraft, DataType, SchemaDraft, TableDraft};
use crate::changelog::{ChangeEntry, ChangeType};
use crate::error::{PortalError, Result};
use crate::lineage::{LineageDraft, MappingType, TransformationType};
use crate::portal::Portal;
use crate::project::{Project, ProjectStore};
use crate::types::{now, ColumnRef, DatabaseType, TableRef};
use chrono::Duration;
use tracing::info;

const SCHEMAS: [(&str, &str); 4] = [
    ("HR_SCHEMA", "Human Resources Schema"),
    ("FINANCE_SCHEMA", "Finance Schema"),
    ("INVENTORY_SCHEMA", "Inventory Management Schema"),
    ("SALES", "Sales and customer analytics"),
];

const TABLES: [(&str, &str, &str); 11] = [
    ("HR_SCHEMA", "employees", "Employee master data"),
    ("HR_SCHEMA", "departments", "Department information"),
    ("FINANCE_SCHEMA", "accounts", "Chart of accounts"),
    ("INVENTORY_SCHEMA", "categories", "Product categories"),
    ("INVENTORY_SCHEMA", "product_details", "Denormalized product view"),
    ("SALES", "customers", "Customer master data"),
    ("SALES", "orders", "Customer orders"),
    ("SALES", "order_items", "Order line items"),
    ("SALES", "customer_summary", "Per-customer aggregates"),
    ("SALES", "order_analytics", "Order level metrics"),
    ("SALES", "user_profile", "Portal user profile"),
];

fn col(schema: &str, table: &str, column: &str) -> ColumnRef {
    ColumnRef::new(schema, table, column)
}

/// Registers a demo project, or reuses one the user already set up under
/// the same name.
async fn demo_project(projects: &ProjectStore, project: Project) -> Result<Project> {
    let name = project.name.clone();
    match projects.create(project).await {
        Err(PortalError::AlreadyExists(_)) => projects
            .by_name(&name)
            .await
            .ok_or_else(|| PortalError::Internal(format!("project {} vanished", name))),
        other => other,
    }
}

/// Loads the demo data set into `portal`
pub async fn seed_demo(portal: &Portal) -> Result<()> {
    let catalog = portal.catalog();
    for (name, description) in SCHEMAS {
        catalog.create_schema(SchemaDraft::new(name, description)).await?;
    }
    for (schema, table, definition) in TABLES {
        catalog
            .create_table(TableDraft::new(schema, table).business_definition(definition))
            .await?;
    }

    let employees = TableRef::new("HR_SCHEMA", "employees");
    let columns = [
        ColumnDraft::new(employees.clone(), "employee_id", DataType::Number)
            .numeric(10, 0)
            .primary_key()
            .definition("Unique employee identifier"),
        ColumnDraft::new(employees.clone(), "first_name", DataType::Varchar2)
            .length(50)
            .not_null()
            .definition("Employee first name"),
        ColumnDraft::new(employees, "salary", DataType::Number)
            .numeric(10, 2)
            .default_value("0")
            .definition("Employee salary"),
        ColumnDraft::new(TableRef::new("INVENTORY_SCHEMA", "categories"), "name", DataType::Varchar2).length(100),
        ColumnDraft::new(TableRef::new("INVENTORY_SCHEMA", "product_details"), "category_name", DataType::Varchar2)
            .length(100),
        ColumnDraft::new(TableRef::new("SALES", "customers"), "id", DataType::Number)
            .numeric(10, 0)
            .primary_key(),
        ColumnDraft::new(TableRef::new("SALES", "customers"), "email", DataType::Varchar2).length(255),
        ColumnDraft::new(TableRef::new("SALES", "order_items"), "price", DataType::Number).numeric(12, 2),
        ColumnDraft::new(TableRef::new("SALES", "order_items"), "quantity", DataType::Number).numeric(6, 0),
        ColumnDraft::new(TableRef::new("SALES", "customer_summary"), "customer_id", DataType::Number)
            .numeric(10, 0),
        ColumnDraft::new(TableRef::new("SALES", "order_analytics"), "total_amount", DataType::Number)
            .numeric(14, 2),
        ColumnDraft::new(TableRef::new("SALES", "user_profile"), "last_login", DataType::Timestamp),
    ];
    for draft in columns {
        catalog.create_column(draft).await?;
    }

    let lineage = portal.lineage_store();
    lineage
        .create(
            LineageDraft::new()
                .with_target(col("SALES", "customer_summary", "customer_id"))
                .with_source(col("SALES", "customers", "id"), TransformationType::Direct)
                .with_logic(TransformationType::Direct, "Direct mapping"),
            "john.doe",
        )
        .await?;
    lineage
        .create(
            LineageDraft::new()
                .with_target(col("SALES", "order_analytics", "total_amount"))
                .with_mapping_type(MappingType::ManyToOne)
                .with_source(col("SALES", "order_items", "price"), TransformationType::Direct)
                .with_source(col("SALES", "order_items", "quantity"), TransformationType::Direct)
                .with_logic(TransformationType::Direct, "SUM(price * quantity)"),
            "jane.smith",
        )
        .await?;
    lineage
        .create(
            LineageDraft::new()
                .with_target(col("INVENTORY_SCHEMA", "product_details", "category_name"))
                .with_source(col("INVENTORY_SCHEMA", "categories", "name"), TransformationType::Conditional)
                .with_logic(TransformationType::Conditional, "Lookup join"),
            "mike.wilson",
        )
        .await?;
    lineage
        .create(
            LineageDraft::new()
                .with_target(col("SALES", "user_profile", "last_login"))
                .with_mapping_type(MappingType::SystemField)
                .with_logic(TransformationType::Direct, "System generated field"),
            "system",
        )
        .await?;

    let projects = portal.project_store();
    let hr = demo_project(
        projects,
        Project::new("HR Analytics", "Workforce reporting")
            .with_schema("HR_SCHEMA")
            .with_schema("FINANCE_SCHEMA"),
    )
    .await?;
    let sales = demo_project(
        projects,
        Project::new("Sales Insights", "Customer and order analytics")
            .with_schema("SALES")
            .with_schema("INVENTORY_SCHEMA"),
    )
    .await?;

    let changes = portal.change_log();
    let entries = [
        (hr.id, ChangeEntry::new("CHG-2024-001", "john.doe", ChangeType::Create)
            .on("employees", "employee_id")
            .description("Added primary key column")
            .at(now() - Duration::days(10))),
        (hr.id, ChangeEntry::new("CHG-2024-002", "jane.smith", ChangeType::Alter)
            .on("employees", "first_name")
            .description("Increased length to 50")
            .at(now() - Duration::days(2))),
        (hr.id, ChangeEntry::new("CHG-2024-003", "mike.wilson", ChangeType::Update)
            .on("employees", "salary")
            .description("Updated business definition")
            .at(now() - Duration::hours(5))),
        (sales.id, ChangeEntry::new("CHG-2024-004", "jane.smith", ChangeType::Create)
            .on("order_analytics", "total_amount")
            .description("Added lineage mapping to order_items")
            .at(now() - Duration::days(1))),
        (sales.id, ChangeEntry::new("CHG-2024-005", "john.doe", ChangeType::Delete)
            .on("customers", "fax")
            .description("Dropped unused column")
            .at(now() - Duration::days(20))),
    ];
    for (project_id, entry) in entries {
        changes.record_change(project_id, entry).await;
    }

    let connections = portal.connections();
    let tested = Some(now() - Duration::hours(3));
    for (name, database_type, host, port, database, status) in [
        ("Production Oracle", DatabaseType::Oracle, "prod-oracle.company.com", 1521, "PROD", ConnectionStatus::Connected),
        ("Analytics PostgreSQL", DatabaseType::PostgreSQL, "analytics-pg.company.com", 5432, "analytics", ConnectionStatus::Connected),
        ("Staging MySQL", DatabaseType::MySQL, "staging-mysql.company.com", 3306, "staging", ConnectionStatus::Disconnected),
    ] {
        let mut connection = DatabaseConnection::new(name, database_type, host, port, database);
        connection.status = status;
        connection.last_tested = tested;
        connections.restore(connection).await;
    }

    let users = portal.users();
    for (username, role, status) in [
        ("john.doe", UserRole::Administrator, UserStatus::Active),
        ("jane.smith", UserRole::DataAnalyst, UserStatus::Active),
        ("mike.wilson", UserRole::DataEngineer, UserStatus::Active),
        ("sarah.johnson", UserRole::Viewer, UserStatus::Inactive),
    ] {
        let mut user = PortalUser::new(username, &format!("{}@company.com", username), role);
        user.status = status;
        users.create(user).await?;
    }

    info!(
        schemas = SCHEMAS.len(),
        tables = TABLES.len(),
        mappings = lineage.len().await,
        "Demo data loaded"
    );
    Ok(())
}
