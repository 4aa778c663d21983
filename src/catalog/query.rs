// Catalog queries

use super::model::{Column, Schema, Table};
use crate::types::{contains_ignore_case, TableRef};

/// Tables belonging to `schema`, or every table when no schema is given.
///
/// The returned iterator borrows `tables`, keeps its order, and can be
/// cloned to restart the scan.
pub fn filter_tables<'a>(
    tables: &'a [Table],
    schema: Option<&'a str>,
) -> impl Iterator<Item = &'a Table> + Clone + 'a {
    tables
        .iter()
        .filter(move |t| schema.map_or(true, |s| t.schema_name == s))
}

/// Columns belonging to `table`, or every column when no table is given.
pub fn filter_columns<'a>(
    columns: &'a [Column],
    table: Option<&'a TableRef>,
) -> impl Iterator<Item = &'a Column> + Clone + 'a {
    columns
        .iter()
        .filter(move |c| table.map_or(true, |t| &c.table_ref == t))
}

/// Schemas whose name or description contains `search` (case-insensitive)
pub fn search_schemas<'a>(
    schemas: &'a [Schema],
    search: &'a str,
) -> impl Iterator<Item = &'a Schema> + Clone + 'a {
    schemas.iter().filter(move |s| {
        contains_ignore_case(&s.name, search) || contains_ignore_case(&s.description, search)
    })
}
