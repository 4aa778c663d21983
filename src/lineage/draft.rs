// Lineage form state

use super::mapping::{MappingSources, MappingType, SourceColumn, TransformationType};
use crate::error::{PortalError, Result};
use crate::types::ColumnRef;
use serde::{Deserialize, Serialize};

/// Dependent schema → table → column selection.
///
/// Choosing a schema clears the table and column; choosing a table clears
/// the column. Nothing else is checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    schema: Option<String>,
    table: Option<String>,
    column: Option<String>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully populated selection
    pub fn of(column: &ColumnRef) -> Self {
        Self {
            schema: Some(column.schema.clone()),
            table: Some(column.table.clone()),
            column: Some(column.column.clone()),
        }
    }

    pub fn select_schema(&mut self, schema: &str) {
        self.schema = non_empty(schema);
        self.table = None;
        self.column = None;
    }

    pub fn select_table(&mut self, table: &str) {
        self.table = non_empty(table);
        self.column = None;
    }

    pub fn select_column(&mut self, column: &str) {
        self.column = non_empty(column);
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.column_ref().is_some()
    }

    pub fn column_ref(&self) -> Option<ColumnRef> {
        match (&self.schema, &self.table, &self.column) {
            (Some(s), Some(t), Some(c)) => Some(ColumnRef::new(s, t, c)),
            _ => None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// One source row in the lineage form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    pub selection: ColumnSelection,
    pub transformation_type: TransformationType,
}

impl SourceRow {
    fn to_source(&self) -> Option<SourceColumn> {
        self.selection
            .column_ref()
            .map(|c| SourceColumn::new(c, self.transformation_type))
    }
}

/// Lineage form: target selection, mapping type and source rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageDraft {
    pub target: ColumnSelection,
    mapping_type: MappingType,
    pub transformation_type: TransformationType,
    pub transformation_logic: String,
    sources: Vec<SourceRow>,
}

impl Default for LineageDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl LineageDraft {
    /// Empty one-to-one form with a single blank source row
    pub fn new() -> Self {
        Self {
            target: ColumnSelection::new(),
            mapping_type: MappingType::OneToOne,
            transformation_type: TransformationType::Direct,
            transformation_logic: String::new(),
            sources: vec![SourceRow::default()],
        }
    }

    /// Sets the target column
    pub fn with_target(mut self, target: ColumnRef) -> Self {
        self.target = ColumnSelection::of(&target);
        self
    }

    /// Switches mapping type first, then fills the next free source row
    pub fn with_mapping_type(mut self, mapping_type: MappingType) -> Self {
        self.set_mapping_type(mapping_type);
        self
    }

    /// Fills the first blank source row, or adds one for many-to-one
    pub fn with_source(mut self, source: ColumnRef, transformation_type: TransformationType) -> Self {
        let row = SourceRow {
            selection: ColumnSelection::of(&source),
            transformation_type,
        };
        match self.sources.iter_mut().find(|r| !r.selection.is_complete()) {
            Some(blank) => *blank = row,
            None if self.mapping_type == MappingType::ManyToOne => self.sources.push(row),
            None => {
                if let Some(first) = self.sources.first_mut() {
                    *first = row;
                }
            }
        }
        self
    }

    pub fn with_logic(mut self, transformation_type: TransformationType, logic: &str) -> Self {
        self.transformation_type = transformation_type;
        self.transformation_logic = logic.to_string();
        self
    }

    pub fn mapping_type(&self) -> MappingType {
        self.mapping_type
    }

    pub fn sources(&self) -> &[SourceRow] {
        &self.sources
    }

    pub fn source_mut(&mut self, index: usize) -> Option<&mut SourceRow> {
        self.sources.get_mut(index)
    }

    /// Changes the mapping type and reshapes the source rows to fit it.
    ///
    /// System fields drop every source row. One-to-one keeps only the first
    /// row. Many-to-one keeps what is there and guarantees one row.
    pub fn set_mapping_type(&mut self, mapping_type: MappingType) {
        match mapping_type {
            MappingType::SystemField => self.sources.clear(),
            MappingType::OneToOne => {
                self.sources.truncate(1);
                if self.sources.is_empty() {
                    self.sources.push(SourceRow::default());
                }
            }
            MappingType::ManyToOne => {
                if self.sources.is_empty() {
                    self.sources.push(SourceRow::default());
                }
            }
        }
        self.mapping_type = mapping_type;
    }

    /// Adds a blank source row. Only many-to-one mappings take more than one.
    pub fn add_source(&mut self) -> Result<usize> {
        if self.mapping_type != MappingType::ManyToOne {
            return Err(PortalError::InvalidInput(format!(
                "{} mappings cannot take additional sources",
                self.mapping_type
            )));
        }
        self.sources.push(SourceRow::default());
        Ok(self.sources.len() - 1)
    }

    /// Removes a source row, keeping at least one for many-to-one
    pub fn remove_source(&mut self, index: usize) -> Result<()> {
        if self.mapping_type != MappingType::ManyToOne || self.sources.len() <= 1 {
            return Err(PortalError::InvalidInput("cannot remove the only source".into()));
        }
        if index >= self.sources.len() {
            return Err(PortalError::InvalidInput(format!("no source row {}", index)));
        }
        self.sources.remove(index);
        Ok(())
    }

    /// Whether the submit control is enabled: target chosen and every
    /// required source row complete.
    pub fn can_submit(&self) -> bool {
        self.target.is_complete()
            && match self.mapping_type {
                MappingType::SystemField => true,
                MappingType::OneToOne => {
                    self.sources.len() == 1 && self.sources[0].selection.is_complete()
                }
                MappingType::ManyToOne => {
                    !self.sources.is_empty() && self.sources.iter().all(|r| r.selection.is_complete())
                }
            }
    }

    /// Splits a submittable draft into target and typed sources
    pub(crate) fn into_parts(self) -> Result<DraftParts> {
        let target = self
            .target
            .column_ref()
            .ok_or_else(|| PortalError::InvalidInput("target column is required".into()))?;
        if !self.can_submit() {
            return Err(PortalError::InvalidInput("every source column is required".into()));
        }

        let mut sources: Vec<SourceColumn> =
            self.sources.iter().filter_map(SourceRow::to_source).collect();
        let sources = match self.mapping_type {
            MappingType::SystemField => MappingSources::SystemField,
            MappingType::OneToOne => MappingSources::OneToOne(sources.remove(0)),
            MappingType::ManyToOne => MappingSources::many_to_one(sources)?,
        };

        Ok(DraftParts {
            target,
            sources,
            transformation_type: self.transformation_type,
            transformation_logic: self.transformation_logic,
        })
    }
}

pub(crate) struct DraftParts {
    pub target: ColumnRef,
    pub sources: MappingSources,
    pub transformation_type: TransformationType,
    pub transformation_logic: String,
}
