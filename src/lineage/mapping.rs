// Column-level lineage mappings

use crate::error::{PortalError, Result};
use crate::repository::Record;
use crate::types::{ColumnRef, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many sources feed the target column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingType {
    /// Exactly one source column
    #[default]
    OneToOne,
    /// One or more source columns
    ManyToOne,
    /// Generated by the system, no source columns
    SystemField,
}

impl MappingType {
    pub const ALL: [MappingType; 3] = [
        MappingType::OneToOne,
        MappingType::ManyToOne,
        MappingType::SystemField,
    ];

    /// Label shown in forms
    pub fn label(&self) -> &'static str {
        match self {
            MappingType::OneToOne => "One-to-One",
            MappingType::ManyToOne => "Many-to-One",
            MappingType::SystemField => "System Field",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            MappingType::OneToOne => "one-to-one",
            MappingType::ManyToOne => "many-to-one",
            MappingType::SystemField => "system-field",
        }
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MappingType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        MappingType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s) || t.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| PortalError::InvalidInput(format!("unknown mapping type: {}", s)))
    }
}

/// Whether a value is copied as-is or derived under a condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationType {
    #[default]
    Direct,
    Conditional,
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformationType::Direct => f.write_str("Direct"),
            TransformationType::Conditional => f.write_str("Conditional"),
        }
    }
}

impl FromStr for TransformationType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(TransformationType::Direct),
            "conditional" => Ok(TransformationType::Conditional),
            other => Err(PortalError::InvalidInput(format!(
                "unknown transformation type: {}",
                other
            ))),
        }
    }
}

/// One source column feeding a mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub transformation_type: TransformationType,
}

impl SourceColumn {
    pub fn new(column: ColumnRef, transformation_type: TransformationType) -> Self {
        Self {
            schema: column.schema,
            table: column.table,
            column: column.column,
            transformation_type,
        }
    }

    pub fn column_ref(&self) -> ColumnRef {
        ColumnRef::new(&self.schema, &self.table, &self.column)
    }
}

/// Sources of a mapping. The variant fixes the mapping type, so a
/// system field can never carry sources and a one-to-one mapping always
/// has exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mapping_type", content = "sources", rename_all = "kebab-case")]
pub enum MappingSources {
    OneToOne(SourceColumn),
    ManyToOne(Vec<SourceColumn>),
    SystemField,
}

impl MappingSources {
    /// Many-to-one sources; at least one is required
    pub fn many_to_one(sources: Vec<SourceColumn>) -> Result<Self> {
        if sources.is_empty() {
            return Err(PortalError::Validation(
                "many-to-one mapping needs at least one source".into(),
            ));
        }
        Ok(MappingSources::ManyToOne(sources))
    }

    pub fn mapping_type(&self) -> MappingType {
        match self {
            MappingSources::OneToOne(_) => MappingType::OneToOne,
            MappingSources::ManyToOne(_) => MappingType::ManyToOne,
            MappingSources::SystemField => MappingType::SystemField,
        }
    }

    pub fn as_slice(&self) -> &[SourceColumn] {
        match self {
            MappingSources::OneToOne(source) => std::slice::from_ref(source),
            MappingSources::ManyToOne(sources) => sources,
            MappingSources::SystemField => &[],
        }
    }
}

/// A lineage record: how source columns produce a target column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageMapping {
    pub id: RecordId,
    pub target_schema: String,
    pub target_table: String,
    pub target_column: String,
    pub transformation_type: TransformationType,
    /// Free text or SQL
    pub transformation_logic: String,
    pub sources: MappingSources,
    pub change_ref_number: String,
    pub created_at: Timestamp,
    pub created_by: String,
}

impl LineageMapping {
    pub fn mapping_type(&self) -> MappingType {
        self.sources.mapping_type()
    }

    pub fn target(&self) -> ColumnRef {
        ColumnRef::new(&self.target_schema, &self.target_table, &self.target_column)
    }

    pub fn source_columns(&self) -> &[SourceColumn] {
        self.sources.as_slice()
    }
}

impl Record for LineageMapping {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
