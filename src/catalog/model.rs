// Catalog records: schemas, tables and columns

use crate::error::{PortalError, Result};
use crate::repository::Record;
use crate::types::{now, RecordId, TableRef, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column data type supported by the catalogued engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "VARCHAR2")]
    Varchar2,
    #[serde(rename = "CHAR")]
    Char,
    #[serde(rename = "NUMBER")]
    Number,
    #[serde(rename = "DATE")]
    Date,
    #[serde(rename = "TIMESTAMP")]
    Timestamp,
    #[serde(rename = "CLOB")]
    Clob,
    #[serde(rename = "BLOB")]
    Blob,
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "RAW")]
    Raw,
    #[serde(rename = "LONG RAW")]
    LongRaw,
}

/// Which sizing attributes a data type takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingKind {
    /// Character length
    Length,
    /// Precision and scale
    Numeric,
    /// No sizing
    None,
}

impl DataType {
    pub const ALL: [DataType; 10] = [
        DataType::Varchar2,
        DataType::Char,
        DataType::Number,
        DataType::Date,
        DataType::Timestamp,
        DataType::Clob,
        DataType::Blob,
        DataType::Long,
        DataType::Raw,
        DataType::LongRaw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Varchar2 => "VARCHAR2",
            DataType::Char => "CHAR",
            DataType::Number => "NUMBER",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Clob => "CLOB",
            DataType::Blob => "BLOB",
            DataType::Long => "LONG",
            DataType::Raw => "RAW",
            DataType::LongRaw => "LONG RAW",
        }
    }

    pub fn sizing(&self) -> SizingKind {
        match self {
            DataType::Varchar2 | DataType::Char => SizingKind::Length,
            DataType::Number => SizingKind::Numeric,
            _ => SizingKind::None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_uppercase();
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| PortalError::InvalidInput(format!("unsupported data type: {}", s)))
    }
}

/// Sizing of a column. Only one of length or precision/scale can be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSize {
    /// No sizing given
    #[default]
    Unsized,
    /// Character length
    Length { length: u32 },
    /// Numeric precision and scale
    Numeric { precision: u8, scale: u8 },
}

impl ColumnSize {
    /// Checks that this sizing is meaningful for `data_type`
    pub fn check(&self, data_type: DataType) -> Result<()> {
        match (self, data_type.sizing()) {
            (ColumnSize::Unsized, _) => Ok(()),
            (ColumnSize::Length { length }, SizingKind::Length) => {
                if *length == 0 {
                    return Err(PortalError::Validation("length must be positive".into()));
                }
                Ok(())
            }
            (ColumnSize::Numeric { precision, scale }, SizingKind::Numeric) => {
                if *precision == 0 || scale > precision {
                    return Err(PortalError::Validation(format!(
                        "invalid precision/scale ({}, {})",
                        precision, scale
                    )));
                }
                Ok(())
            }
            (size, _) => Err(PortalError::Validation(format!(
                "{} does not take {:?}",
                data_type, size
            ))),
        }
    }
}

impl fmt::Display for ColumnSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSize::Unsized => Ok(()),
            ColumnSize::Length { length } => write!(f, "({})", length),
            ColumnSize::Numeric { precision, scale } => write!(f, "({},{})", precision, scale),
        }
    }
}

/// Database schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub updated_at: Timestamp,
}

impl Record for Schema {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Table within a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: RecordId,
    pub schema_name: String,
    pub name: String,
    pub business_definition: String,
    pub updated_at: Timestamp,
}

impl Table {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.schema_name, &self.name)
    }
}

impl Record for Table {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Column within a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: RecordId,
    pub table_ref: TableRef,
    pub name: String,
    pub data_type: DataType,
    pub size: ColumnSize,
    pub nullable: bool,
    pub primary_key: bool,
    pub partition_column: bool,
    pub default_value: Option<String>,
    pub definition: String,
}

impl Column {
    /// Type rendered the way DDL spells it, e.g. `NUMBER(10,2)`
    pub fn type_display(&self) -> String {
        format!("{}{}", self.data_type, self.size)
    }
}

impl Record for Column {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Form input for a new schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDraft {
    pub name: String,
    pub description: String,
}

impl SchemaDraft {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub(crate) fn into_schema(self) -> Result<Schema> {
        let name = required("schema name", &self.name)?;
        Ok(Schema {
            id: 0,
            name,
            description: self.description,
            updated_at: now(),
        })
    }
}

/// Form input for a new table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDraft {
    pub schema_name: String,
    pub name: String,
    pub business_definition: String,
}

impl TableDraft {
    pub fn new(schema_name: &str, name: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            name: name.to_string(),
            business_definition: String::new(),
        }
    }

    pub fn business_definition(mut self, definition: &str) -> Self {
        self.business_definition = definition.to_string();
        self
    }

    pub(crate) fn into_table(self) -> Result<Table> {
        let schema_name = required("schema", &self.schema_name)?;
        let name = required("table name", &self.name)?;
        Ok(Table {
            id: 0,
            schema_name,
            name,
            business_definition: self.business_definition,
            updated_at: now(),
        })
    }
}

/// Form input for a new column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDraft {
    pub table_ref: TableRef,
    pub name: String,
    pub data_type: DataType,
    pub size: ColumnSize,
    pub nullable: bool,
    pub primary_key: bool,
    pub partition_column: bool,
    pub default_value: Option<String>,
    pub definition: String,
}

impl ColumnDraft {
    /// New nullable, unsized column
    pub fn new(table_ref: TableRef, name: &str, data_type: DataType) -> Self {
        Self {
            table_ref,
            name: name.to_string(),
            data_type,
            size: ColumnSize::Unsized,
            nullable: true,
            primary_key: false,
            partition_column: false,
            default_value: None,
            definition: String::new(),
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.size = ColumnSize::Length { length };
        self
    }

    pub fn numeric(mut self, precision: u8, scale: u8) -> Self {
        self.size = ColumnSize::Numeric { precision, scale };
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as primary key; primary keys are never nullable
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn partition_column(mut self) -> Self {
        self.partition_column = true;
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn definition(mut self, definition: &str) -> Self {
        self.definition = definition.to_string();
        self
    }

    /// Switches data type, dropping sizing the new type cannot take
    pub fn set_data_type(&mut self, data_type: DataType) {
        if self.size.check(data_type).is_err() {
            self.size = ColumnSize::Unsized;
        }
        self.data_type = data_type;
    }

    pub(crate) fn into_column(self) -> Result<Column> {
        let name = required("column name", &self.name)?;
        self.size.check(self.data_type)?;
        if self.primary_key && self.nullable {
            return Err(PortalError::Validation(format!(
                "primary key column {} cannot be nullable",
                name
            )));
        }
        Ok(Column {
            id: 0,
            table_ref: self.table_ref,
            name,
            data_type: self.data_type,
            size: self.size,
            nullable: self.nullable,
            primary_key: self.primary_key,
            partition_column: self.partition_column,
            default_value: self.default_value.filter(|v| !v.is_empty()),
            definition: self.definition,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::InvalidInput(format!("{} is required", field)));
    }
    Ok(value.to_string())
}
