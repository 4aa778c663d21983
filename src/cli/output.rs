//! Output formatting for the CLI

use crate::catalog::{Column, Schema, Table};
use crate::changelog::ChangeRecord;
use crate::lineage::LineageMapping;
use crate::project::Project;
use crate::reports::{ColumnImpact, TableCoverage};
use crate::types::Timestamp;
use console::{style, Style};
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style as TableStyle, Table as TextTable, Tabled};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prints `items` as a table of rows, or as JSON of the records themselves
pub fn print_list<T, R, F>(items: &[T], format: OutputFormat, to_row: F) -> serde_json::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", style("No results found").dim());
            } else {
                let rows: Vec<R> = items.iter().map(to_row).collect();
                println!("{}", TextTable::new(rows).with(TableStyle::rounded()));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

/// Print a single item
pub fn print_single<T: Serialize>(data: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Success message
pub fn success(msg: impl Display) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Error message
pub fn error(msg: impl Display) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: impl Display) {
    let key_style = Style::new().cyan().bold();
    println!("{}: {}", key_style.apply_to(key), value);
}

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(title).bold().underlined());
    println!();
}

/// Status indicator with color
pub fn status_indicator(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "active" | "connected" | "good" | "low" => format!("{}", style(status).green()),
        "maintenance" | "fair" | "medium" => format!("{}", style(status).yellow()),
        "inactive" | "disconnected" | "poor" | "high" => format!("{}", style(status).red()),
        _ => status.to_string(),
    }
}

fn format_time(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Tabled)]
pub struct SchemaRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Updated")]
    pub updated: String,
}

impl From<&Schema> for SchemaRow {
    fn from(s: &Schema) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            description: s.description.clone(),
            updated: format_time(&s.updated_at),
        }
    }
}

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Schema")]
    pub schema: String,
    #[tabled(rename = "Table")]
    pub name: String,
    #[tabled(rename = "Business Definition")]
    pub definition: String,
    #[tabled(rename = "Updated")]
    pub updated: String,
}

impl From<&Table> for TableRow {
    fn from(t: &Table) -> Self {
        Self {
            id: t.id,
            schema: t.schema_name.clone(),
            name: t.name.clone(),
            definition: t.business_definition.clone(),
            updated: format_time(&t.updated_at),
        }
    }
}

#[derive(Tabled)]
pub struct ColumnRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Table")]
    pub table: String,
    #[tabled(rename = "Column")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub data_type: String,
    #[tabled(rename = "Null")]
    pub nullable: &'static str,
    #[tabled(rename = "Key")]
    pub key: &'static str,
    #[tabled(rename = "Default")]
    pub default_value: String,
}

impl From<&Column> for ColumnRow {
    fn from(c: &Column) -> Self {
        Self {
            id: c.id,
            table: c.table_ref.to_string(),
            name: c.name.clone(),
            data_type: c.type_display(),
            nullable: if c.nullable { "Y" } else { "N" },
            key: match (c.primary_key, c.partition_column) {
                (true, _) => "PK",
                (false, true) => "PART",
                _ => "",
            },
            default_value: c.default_value.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct LineageRow {
    #[tabled(rename = "Ref")]
    pub change_ref: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Type")]
    pub mapping_type: String,
    #[tabled(rename = "Sources")]
    pub sources: String,
    #[tabled(rename = "Logic")]
    pub logic: String,
    #[tabled(rename = "Created By")]
    pub created_by: String,
}

impl From<&LineageMapping> for LineageRow {
    fn from(m: &LineageMapping) -> Self {
        let sources = m
            .source_columns()
            .iter()
            .map(|s| format!("{}.{}", s.table, s.column))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            change_ref: m.change_ref_number.clone(),
            target: m.target().to_string(),
            mapping_type: m.mapping_type().to_string(),
            sources,
            logic: m.transformation_logic.clone(),
            created_by: m.created_by.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct ProjectRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Schemas")]
    pub schemas: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Updated")]
    pub updated: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            schemas: p.schemas.iter().cloned().collect::<Vec<_>>().join(", "),
            status: status_indicator(&p.status.to_string()),
            updated: format_time(&p.last_updated),
        }
    }
}

#[derive(Tabled)]
pub struct ChangeRow {
    #[tabled(rename = "Ref")]
    pub change_ref: String,
    #[tabled(rename = "When")]
    pub timestamp: String,
    #[tabled(rename = "User")]
    pub user: String,
    #[tabled(rename = "Type")]
    pub change_type: String,
    #[tabled(rename = "Object")]
    pub object: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&ChangeRecord> for ChangeRow {
    fn from(c: &ChangeRecord) -> Self {
        Self {
            change_ref: c.change_ref_number.clone(),
            timestamp: format_time(&c.timestamp),
            user: c.user.clone(),
            change_type: c.change_type.to_string(),
            object: format!("{}.{}", c.table, c.column),
            description: c.description.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct CoverageRow {
    #[tabled(rename = "Table")]
    pub table: String,
    #[tabled(rename = "Columns")]
    pub total: usize,
    #[tabled(rename = "Mapped")]
    pub mapped: usize,
    #[tabled(rename = "Coverage")]
    pub coverage: String,
}

impl From<&TableCoverage> for CoverageRow {
    fn from(c: &TableCoverage) -> Self {
        Self {
            table: c.table.to_string(),
            total: c.total_columns,
            mapped: c.mapped_columns,
            coverage: status_indicator_with(&format!("{}%", c.coverage), &c.band.to_string()),
        }
    }
}

#[derive(Tabled)]
pub struct ImpactRow {
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Impacted Tables")]
    pub impacted: String,
    #[tabled(rename = "Dependencies")]
    pub dependencies: usize,
    #[tabled(rename = "Risk")]
    pub risk: String,
}

impl From<&ColumnImpact> for ImpactRow {
    fn from(i: &ColumnImpact) -> Self {
        Self {
            source: i.source.to_string(),
            impacted: i
                .impacted_tables
                .iter()
                .map(|t| t.table.clone())
                .collect::<Vec<_>>()
                .join(", "),
            dependencies: i.dependencies,
            risk: status_indicator(&i.risk.to_string()),
        }
    }
}

/// Colors `text` the way `status_indicator` colors `status`
fn status_indicator_with(text: &str, status: &str) -> String {
    match status {
        "good" => format!("{}", style(text).green()),
        "fair" => format!("{}", style(text).yellow()),
        "poor" => format!("{}", style(text).red()),
        _ => text.to_string(),
    }
}
